//! Snapshot Module
//!
//! Text encoding used by `RecordStore::backup` and `RecordStore::restore`.

pub mod codec;
mod error;

pub use codec::{SnapshotData, SnapshotRecord};
pub use error::SnapshotError;
