//! Error types

use thiserror::Error;

/// Errors returned by the strict store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key is absent or has expired
    #[error("key not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Returns `true` for the not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
