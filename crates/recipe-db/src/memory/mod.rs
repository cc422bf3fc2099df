//! In-memory store implementing every repository trait
//!
//! Backs the service and HTTP tests without a database. Data does not
//! survive a restart.

mod store;
mod transaction;

pub use store::MemoryStore;
pub use transaction::MemoryReactionTransaction;
