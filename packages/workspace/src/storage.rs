//! Directory-backed document storage.
//!
//! Layout under the data directory:
//!
//! ```text
//! <dataDir>/
//!   last-doc          id of the last opened document
//!   maps/
//!     <id>.json       one pretty-printed ExportMap per document
//! ```
//!
//! Writes go to a temporary sibling file that is then renamed over the
//! target, so a crash mid-write never leaves a truncated document behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use conceptmap_editor::{sort_recent_first, DocumentStorage, ExportMap, StorageError, StorageResult};
use tokio::fs;
use tracing::{debug, warn};

pub const MAPS_DIR: &str = "maps";
const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Storage rooted at `<data_dir>/maps`. The directory is created on first write.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join(MAPS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> StorageResult<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(format!("{}.{}", id, EXTENSION)))
    }

    async fn read_document(path: &Path) -> StorageResult<ExportMap> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Ids become file names, so only `[A-Za-z0-9_-]` is accepted
fn validate_id(id: &str) -> StorageResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidId(id.to_string()))
    }
}

#[async_trait]
impl DocumentStorage for DirectoryStorage {
    async fn get(&self, id: &str) -> StorageResult<Option<ExportMap>> {
        let path = self.path_for(id)?;

        match Self::read_document(&path).await {
            Ok(document) => Ok(Some(document)),
            Err(StorageError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn put(&self, document: &ExportMap) -> StorageResult<()> {
        let path = self.path_for(&document.id)?;
        let temp_path = self.root.join(format!(".{}.{}.tmp", document.id, EXTENSION));
        let content = serde_json::to_string_pretty(document)?;

        fs::create_dir_all(&self.root).await?;
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(document_id = %document.id, path = %path.display(), "Wrote document");
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ExportMap>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|ext| ext == EXTENSION).unwrap_or(false) {
                match Self::read_document(&path).await {
                    Ok(document) => documents.push(document),
                    Err(err) => warn!(path = %path.display(), error = %err, "Skipping unreadable document"),
                }
            }
        }

        sort_recent_first(&mut documents);
        Ok(documents)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.path_for(id)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(document_id = %id, "Deleted document");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conceptmap_editor::{build_export_map, DocumentMetadata, SCHEMA_VERSION};

    fn document(id: &str, updated_at: &str) -> ExportMap {
        let metadata = DocumentMetadata {
            id: id.to_string(),
            name: format!("Map {}", id),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: updated_at.to_string(),
        };
        build_export_map(&metadata, &[], &[], SCHEMA_VERSION)
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        let doc = document("abc", "2024-01-01T00:00:00.000Z");

        assert_eq!(storage.get("abc").await.unwrap(), None);
        storage.put(&doc).await.unwrap();

        assert_eq!(storage.get("abc").await.unwrap(), Some(doc));
        assert!(dir.path().join("maps").join("abc.json").exists());
        assert!(!dir.path().join("maps").join(".abc.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(&dir.path().join("nowhere"));

        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorted_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.put(&document("old", "2024-01-01T00:00:00.000Z")).await.unwrap();
        storage.put(&document("new", "2024-06-01T00:00:00.000Z")).await.unwrap();
        std::fs::write(storage.root().join("broken.json"), "{ nope").unwrap();
        std::fs::write(storage.root().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<String> = storage.list().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.put(&document("gone", "2024-01-01T00:00:00.000Z")).await.unwrap();

        storage.delete("gone").await.unwrap();
        storage.delete("gone").await.unwrap();
        assert_eq!(storage.get("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());

        for id in ["", "../escape", "a/b", "a.b"] {
            assert!(matches!(
                storage.get(id).await,
                Err(StorageError::InvalidId(_))
            ));
        }
        assert!(matches!(
            storage.put(&document("../x", "t")).await,
            Err(StorageError::InvalidId(_))
        ));
    }
}
