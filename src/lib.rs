//! RECSTORE - In-Memory Record Store
//!
//! Records of string fields keyed by id, with monotonic TTLs, equality
//! filtering and a line-oriented snapshot format for backup and restore.

pub mod metrics;
pub mod shell;
pub mod snapshot;
pub mod storage;

pub use metrics::Metrics;
pub use shell::{Command, CommandError, Reply, Shell, ShellConfig};
pub use snapshot::SnapshotError;
pub use storage::{RecordStore, SharedStore, TtlTable};
