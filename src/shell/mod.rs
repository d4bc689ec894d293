//! Shell Module
//!
//! Line-oriented command harness over a [`RecordStore`](crate::storage::RecordStore).
//! It holds no state of its own beyond the session snapshot slot and metrics.

mod command;
mod config;
mod handler;
mod reply;

pub use command::{Command, CommandError};
pub use config::ShellConfig;
pub use handler::Shell;
pub use reply::Reply;
