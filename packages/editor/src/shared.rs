//! # Shared Store Handle
//!
//! Cloneable handle over one [`DocumentStore`]. Mutations go through
//! [`SharedStore::update`], which publishes the store revision on a `watch`
//! channel so observers (the autosave pipeline) can re-read the live state.
//!
//! The lock is only ever held for the duration of a synchronous closure;
//! nothing awaits while holding it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::document::DocumentStore;
use crate::errors::EditorError;
use crate::model::now_iso;
use crate::schema::ExportMap;
use crate::storage::DocumentStorage;

#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<DocumentStore>>,
    changes: Arc<watch::Sender<u64>>,
}

impl SharedStore {
    pub fn new(store: DocumentStore) -> Self {
        let (changes, _) = watch::channel(store.revision());
        Self {
            inner: Arc::new(Mutex::new(store)),
            changes: Arc::new(changes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DocumentStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the current state
    pub fn read<R>(&self, f: impl FnOnce(&DocumentStore) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with mutable access, then notify subscribers if anything changed
    pub fn update<R>(&self, f: impl FnOnce(&mut DocumentStore) -> R) -> R {
        let (result, changed) = {
            let mut store = self.lock();
            let before = store.revision();
            let result = f(&mut store);
            let after = store.revision();
            (result, (after != before).then_some(after))
        };

        if let Some(revision) = changed {
            self.changes.send_replace(revision);
        }
        result
    }

    /// Receiver that wakes on every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Persist the current document.
    ///
    /// Returns `Ok(None)` when no document is loaded. On failure the store is
    /// left untouched.
    pub async fn save_current_document(
        &self,
        storage: &dyn DocumentStorage,
    ) -> Result<Option<ExportMap>, EditorError> {
        let Some(document) = self.read(|store| store.prepare_save(&now_iso())) else {
            debug!("No document loaded, nothing to save");
            return Ok(None);
        };

        storage.put(&document).await?;
        self.update(|store| store.commit_save(&document));

        info!(
            document_id = %document.id,
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "Saved document"
        );
        Ok(Some(document))
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new(DocumentStore::new())
    }
}
