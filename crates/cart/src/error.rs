//! Cart store errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by cart mutations.
///
/// Invalid input (a quantity below one, an unknown product id) is never an
/// error; those calls are silent no-ops. Only the backing store can fail.
#[derive(Debug, Error)]
pub enum CartError {
    /// The key-value store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The line items could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
