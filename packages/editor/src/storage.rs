//! # Document Storage Contract
//!
//! The durable key-value backend the editor saves into. Implementations live
//! outside the engine (see the workspace crate for the directory-backed one);
//! [`MemoryStorage`] is an in-process implementation for tests and embedding.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::schema::ExportMap;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document id: {0:?}")]
    InvalidId(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable document store keyed by document id
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Fetch a document, `None` if it does not exist
    async fn get(&self, id: &str) -> StorageResult<Option<ExportMap>>;

    /// Insert or replace a document
    async fn put(&self, document: &ExportMap) -> StorageResult<()>;

    /// All documents, most recently updated first
    async fn list(&self) -> StorageResult<Vec<ExportMap>>;

    /// Remove a document (missing ids are not an error)
    async fn delete(&self, id: &str) -> StorageResult<()>;
}

/// Order documents by `metadata.updatedAt`, newest first
pub fn sort_recent_first(documents: &mut [ExportMap]) {
    documents.sort_by(|a, b| b.metadata.updated_at.cmp(&a.metadata.updated_at));
}

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, ExportMap>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> MutexGuard<'_, HashMap<String, ExportMap>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn get(&self, id: &str) -> StorageResult<Option<ExportMap>> {
        Ok(self.documents().get(id).cloned())
    }

    async fn put(&self, document: &ExportMap) -> StorageResult<()> {
        self.documents()
            .insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ExportMap>> {
        let mut documents: Vec<ExportMap> = self.documents().values().cloned().collect();
        sort_recent_first(&mut documents);
        Ok(documents)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.documents().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentMetadata;
    use crate::schema::{build_export_map, SCHEMA_VERSION};

    fn document(id: &str, updated_at: &str) -> ExportMap {
        let metadata = DocumentMetadata {
            id: id.to_string(),
            name: id.to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: updated_at.to_string(),
        };
        build_export_map(&metadata, &[], &[], SCHEMA_VERSION)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let storage = MemoryStorage::new();
        let doc = document("a", "2024-01-01T00:00:00.000Z");

        storage.put(&doc).await.unwrap();
        assert_eq!(storage.get("a").await.unwrap(), Some(doc));
        assert_eq!(storage.get("missing").await.unwrap(), None);

        storage.delete("a").await.unwrap();
        assert!(storage.is_empty());
        storage.delete("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let storage = MemoryStorage::new();
        storage.put(&document("old", "2024-01-01T00:00:00.000Z")).await.unwrap();
        storage.put(&document("new", "2024-03-01T00:00:00.000Z")).await.unwrap();
        storage.put(&document("mid", "2024-02-01T00:00:00.000Z")).await.unwrap();

        let ids: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();

        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
