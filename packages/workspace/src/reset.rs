use conceptmap_editor::DocumentStorage;
use tracing::info;

use crate::errors::WorkspaceResult;
use crate::last_doc::LastDocument;

/// Forget the last-opened document and delete every stored document.
///
/// Returns the number of documents deleted.
pub async fn reset_app_data(storage: &dyn DocumentStorage, last_doc: &LastDocument) -> WorkspaceResult<usize> {
    last_doc.clear().await?;

    let documents = storage.list().await?;
    for document in &documents {
        storage.delete(&document.id).await?;
    }

    info!(documents = documents.len(), "Reset app data");
    Ok(documents.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conceptmap_editor::{DocumentStore, MemoryStorage};

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let last_doc = LastDocument::new(dir.path());
        let storage = MemoryStorage::new();

        for name in ["a", "b", "c"] {
            let mut store = DocumentStore::new();
            store.new_document(Some(name));
            storage.put(&store.export().unwrap()).await.unwrap();
        }
        last_doc.write("whatever").await.unwrap();

        let deleted = reset_app_data(&storage, &last_doc).await.unwrap();

        assert_eq!(deleted, 3);
        assert!(storage.is_empty());
        assert_eq!(last_doc.read().await, None);
    }
}
