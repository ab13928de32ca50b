//! Pointer to the most recently opened document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

pub const LAST_DOC_FILE: &str = "last-doc";

#[derive(Debug, Clone)]
pub struct LastDocument {
    path: PathBuf,
}

impl LastDocument {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(LAST_DOC_FILE),
        }
    }

    /// The remembered id, if any. Unreadable pointers count as absent.
    pub async fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let id = content.trim();
                (!id.is_empty()).then(|| id.to_string())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ignoring unreadable last-doc pointer");
                None
            }
        }
    }

    pub async fn write(&self, id: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, id).await
    }

    pub async fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
