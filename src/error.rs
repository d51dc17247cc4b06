//! Error types for tree operations.

use thiserror::Error;

/// Result type alias for fallible tree operations.
pub type Result<T> = std::result::Result<T, AvlError>;

/// Errors reported by [`AvlTree`](crate::AvlTree).
///
/// Insertion and lookup never fail; only removal and the diagnostic export
/// can produce an error. The tree is left untouched whenever one is returned.
#[derive(Error, Debug)]
pub enum AvlError {
    /// Removal requested for a key that is not stored in the tree.
    #[error("key not found")]
    KeyNotFound,

    /// Removal attempted against an empty tree.
    #[error("cannot remove from an empty tree")]
    EmptyTree,

    /// A traversal order name that is not one of pre/in/post.
    #[error("unknown traversal order '{0}'")]
    UnknownTraversalOrder(String),

    /// The diagram file could not be created or written.
    #[error("diagram export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AvlError {
    /// Returns `true` for the two removal-lookup failures.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, AvlError::KeyNotFound | AvlError::EmptyTree)
    }
}
