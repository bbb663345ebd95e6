use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// A write operation was given an empty path. Reads tolerate an empty
    /// path (they address the root); writes require a concrete target.
    #[error("path must not be empty")]
    InvalidPath,
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
