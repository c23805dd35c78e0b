//! TTLKV - In-Process Key-Value Store with Expiration
//!
//! A thread-safe map from string keys to values with optional per-entry
//! time-to-live. Expired entries are removed lazily, on the next access
//! to the same key, under a single reader/writer lock.
//!
//! ```rust
//! use std::time::Duration;
//! use ttlkv::Store;
//!
//! let store = Store::new();
//! store.put("session", "abc", Duration::from_secs(30));
//! assert_eq!(store.get("session"), Some("abc"));
//!
//! store.delete("session");
//! assert_eq!(store.get("session"), None);
//! ```

pub mod command;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod stress;

pub use command::{Command, CommandError, Reply};
pub use error::StoreError;
pub use metrics::Metrics;
pub use storage::{Store, StoreConfig, StoreStats};
pub use stress::{StressConfig, StressReport};
