//! Storage Engine
//!
//! In-memory record store with TTL support.

mod shared;
mod store;
mod ttl;

pub use shared::SharedStore;
pub use store::RecordStore;
pub use ttl::TtlTable;
