use thiserror::Error;

use formtree_store::StoreError;

/// Errors from form-tree construction and store writes.
///
/// Construction-time contract violations fail immediately; they are
/// programmer errors, not runtime conditions to recover from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A node name contained the path separator, which is reserved for path
    /// composition.
    #[error("name must not contain the path separator: {name:?}")]
    InvalidName { name: String },
    /// A node was constructed against a scope that has already been torn
    /// down.
    #[error("enclosing scope has been detached")]
    DetachedScope,
    /// A store write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for form-tree operations.
pub type Result<T> = std::result::Result<T, FormError>;
