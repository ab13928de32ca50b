use conceptmap_editor::{EditorError, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Failed to save document {0}")]
    SaveFailed(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
