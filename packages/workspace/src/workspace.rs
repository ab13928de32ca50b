//! # Workspace
//!
//! Application layer around one [`SharedStore`]: picks the document to open
//! at startup, keeps the last-opened pointer current, runs autosave and
//! switches between stored documents.
//!
//! ## Bootstrap
//!
//! ```text
//! list stored documents
//!   ├─ none            → new document (saved immediately)
//!   └─ some            → last-opened if still listed, else most recent
//!                          └─ fetch fails → new document
//! ```
//!
//! Before the current document is replaced (switch, new, delete) any dirty
//! state is flushed through the autosave pipeline.

use std::path::Path;
use std::sync::Arc;

use conceptmap_editor::{
    AutosavePipeline, DocumentMetadata, DocumentStorage, DocumentStore, DocumentSummary, ExportMap,
    SaveOutcome, SharedStore,
};
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::last_doc::LastDocument;
use crate::storage::DirectoryStorage;

pub struct Workspace {
    store: SharedStore,
    storage: Arc<dyn DocumentStorage>,
    last_doc: LastDocument,
    autosave: Option<AutosavePipeline>,
}

impl Workspace {
    /// Bootstrap the current document and start autosave
    pub async fn open(
        storage: Arc<dyn DocumentStorage>,
        last_doc: LastDocument,
        config: &Config,
    ) -> WorkspaceResult<Self> {
        let store = SharedStore::new(DocumentStore::with_history_limit(config.history_limit));
        let mut workspace = Self {
            store,
            storage,
            last_doc,
            autosave: None,
        };

        workspace.bootstrap().await?;
        workspace.autosave = Some(AutosavePipeline::spawn(
            workspace.store.clone(),
            Arc::clone(&workspace.storage),
            config.autosave_config(),
        ));

        Ok(workspace)
    }

    /// Open the workspace stored under `data_dir`
    pub async fn open_dir(data_dir: &Path, config: &Config) -> WorkspaceResult<Self> {
        let storage: Arc<dyn DocumentStorage> = Arc::new(DirectoryStorage::new(data_dir));
        Self::open(storage, LastDocument::new(data_dir), config).await
    }

    async fn bootstrap(&mut self) -> WorkspaceResult<()> {
        let documents = self.storage.list().await?;
        let Some(most_recent) = documents.first() else {
            info!("No stored documents, starting a new one");
            self.create_document(None).await?;
            return Ok(());
        };

        self.store.update(|store| store.set_documents(summaries(&documents)));

        let chosen = match self.last_doc.read().await {
            Some(id) if documents.iter().any(|doc| doc.id == id) => id,
            _ => most_recent.id.clone(),
        };

        match self.storage.get(&chosen).await {
            Ok(Some(document)) => {
                self.store.update(|store| store.load_document(&document));
                self.remember_current().await?;
            }
            Ok(None) => {
                warn!(document_id = %chosen, "Stored document disappeared, starting a new one");
                self.create_document(None).await?;
            }
            Err(err) => {
                warn!(document_id = %chosen, error = %err, "Failed to load document, starting a new one");
                self.create_document(None).await?;
            }
        }

        Ok(())
    }

    /// Create a document, persist it and make it current
    async fn create_document(&self, name: Option<&str>) -> WorkspaceResult<DocumentMetadata> {
        let metadata = self.store.update(|store| store.new_document(name).clone());
        // A fresh document is its own autosave baseline, so it is written here
        self.store.save_current_document(self.storage.as_ref()).await?;
        self.remember_current().await?;
        Ok(metadata)
    }

    async fn remember_current(&self) -> WorkspaceResult<()> {
        let id = self.current_id();
        self.last_doc.write(&id).await?;
        Ok(())
    }

    /// Save pending edits of the current document now.
    ///
    /// Returns whether anything was written.
    pub async fn save(&self) -> WorkspaceResult<bool> {
        let Some(autosave) = &self.autosave else {
            return Ok(false);
        };

        match autosave.flush().await {
            Some(SaveOutcome::Saved { .. }) => Ok(true),
            Some(SaveOutcome::Failed) => Err(WorkspaceError::SaveFailed(self.current_id())),
            Some(SaveOutcome::Skipped) | None => Ok(false),
        }
    }

    /// Flush the current document, then start a new one
    pub async fn new_document(&mut self, name: Option<&str>) -> WorkspaceResult<DocumentMetadata> {
        self.save().await?;
        self.create_document(name).await
    }

    /// Make the stored document `id` current.
    ///
    /// Blank or unknown ids leave the current document untouched and return `false`.
    pub async fn switch_document(&mut self, id: &str) -> WorkspaceResult<bool> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(false);
        }
        let Some(document) = self.storage.get(id).await? else {
            return Ok(false);
        };

        self.save().await?;
        self.store.update(|store| store.load_document(&document));
        self.remember_current().await?;

        info!(document_id = %id, "Switched document");
        Ok(true)
    }

    /// Store `document` and make it current
    pub async fn import_document(&mut self, document: ExportMap) -> WorkspaceResult<DocumentMetadata> {
        if document.id.is_empty() {
            return Err(WorkspaceError::InvalidDocument("missing id".to_string()));
        }
        if document.metadata.id != document.id {
            return Err(WorkspaceError::InvalidDocument(format!(
                "metadata id {:?} does not match document id {:?}",
                document.metadata.id, document.id
            )));
        }

        self.save().await?;
        self.storage.put(&document).await?;
        self.refresh_documents().await?;
        self.switch_document(&document.id).await?;

        Ok(document.metadata)
    }

    /// Delete a stored document. Deleting the current document moves to the
    /// most recent remaining one, or a new one.
    pub async fn delete_document(&mut self, id: &str) -> WorkspaceResult<bool> {
        if self.storage.get(id).await?.is_none() {
            return Ok(false);
        }

        if self.current_id() == id {
            self.save().await?;
            let next = self
                .storage
                .list()
                .await?
                .into_iter()
                .find(|doc| doc.id != id);

            match next {
                Some(document) => {
                    self.store.update(|store| store.load_document(&document));
                    self.remember_current().await?;
                }
                None => {
                    self.create_document(None).await?;
                }
            }
        }

        self.storage.delete(id).await?;
        self.refresh_documents().await?;

        info!(document_id = %id, "Deleted document");
        Ok(true)
    }

    /// Reload the document list from storage
    pub async fn refresh_documents(&self) -> WorkspaceResult<()> {
        let documents = self.storage.list().await?;
        self.store.update(|store| store.set_documents(summaries(&documents)));
        Ok(())
    }

    /// Stop autosave, saving a dirty document first when `flush` is set
    pub async fn close(mut self, flush: bool) {
        if let Some(autosave) = self.autosave.take() {
            autosave.shutdown(flush).await;
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn storage(&self) -> &Arc<dyn DocumentStorage> {
        &self.storage
    }

    pub fn current_id(&self) -> String {
        self.store.read(|store| store.metadata().id.clone())
    }

    pub fn current_metadata(&self) -> DocumentMetadata {
        self.store.read(|store| store.metadata().clone())
    }

    pub fn documents(&self) -> Vec<DocumentSummary> {
        self.store.read(|store| store.documents().to_vec())
    }
}

/// Fetch a stored document, failing if it does not exist
pub async fn fetch_document(storage: &dyn DocumentStorage, id: &str) -> WorkspaceResult<ExportMap> {
    storage
        .get(id)
        .await?
        .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
}

fn summaries(documents: &[ExportMap]) -> Vec<DocumentSummary> {
    documents
        .iter()
        .map(|document| DocumentSummary::from(&document.metadata))
        .collect()
}
