//! Error types for the editor

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
