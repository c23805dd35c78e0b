//! Storage Engine
//!
//! In-memory key-value store with lazy TTL expiration.

mod config;
mod entry;
mod stats;
mod store;

pub use config::StoreConfig;
pub use entry::ttl_from_millis;
pub use stats::StoreStats;
pub use store::Store;
