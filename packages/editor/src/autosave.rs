//! # Autosave Pipeline
//!
//! Observes the shared store and persists the current document once edits
//! settle.
//!
//! ## Flow
//!
//! ```text
//! SharedStore::update ──watch──▶ AutosaveScheduler::observe ──▶ deadline
//!                                                                  │
//!                             sleep_until(deadline) ◀──────────────┘
//!                                     │
//!                                     ▼
//!                      take_due ──▶ spawned save ──mpsc──▶ finish ──▶ (reschedule)
//! ```
//!
//! ## Rules
//!
//! - A document is dirty when its signature differs from the baseline taken at
//!   load time or at the last confirmed save
//! - Each qualifying change pushes the deadline out to `now + debounce`
//! - No attempt starts earlier than `floor` after the previous attempt, where
//!   `floor = max(throttle, debounce)`
//! - At most one save runs at a time; on completion the live signature is
//!   rechecked and another save is scheduled if still dirty
//! - A failed save leaves the baseline untouched and is not retried until the
//!   next change
//! - Switching documents resets the baseline and cancels the pending deadline
//!
//! Timer callbacks never capture state: every wake-up reads the live store
//! through [`SharedStore::read`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::document::DocumentStore;
use crate::model::{Edge, Node};
use crate::schema::{export_edge, export_node, ExportEdge, ExportMap, ExportNode};
use crate::shared::SharedStore;
use crate::storage::DocumentStorage;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(1200);

/// Autosave timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period that coalesces bursts of edits
    pub debounce: Duration,

    /// Minimum spacing between save attempts (raised to `debounce` if smaller)
    pub throttle: Duration,
}

impl AutosaveConfig {
    pub fn from_millis(debounce_ms: u64, throttle_ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            throttle: Duration::from_millis(throttle_ms),
        }
    }

    /// Effective throttle floor
    pub fn floor(&self) -> Duration {
        self.throttle.max(self.debounce)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// What the scheduler needs to know about the live store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveView {
    pub ready: bool,
    pub document_id: String,
    /// Changes whenever a document is created or (re)loaded
    pub generation: u64,
    pub signature: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignatureInput<'a> {
    document_id: &'a str,
    name: &'a str,
    nodes: &'a [ExportNode],
    edges: &'a [ExportEdge],
}

fn encode_signature(document_id: &str, name: &str, nodes: &[ExportNode], edges: &[ExportEdge]) -> String {
    let input = SignatureInput {
        document_id,
        name,
        nodes,
        edges,
    };
    serde_json::to_string(&input).unwrap_or_default()
}

/// Canonical, order-preserving serialization of the persisted content.
///
/// Timestamps and transient flags (`selected`, `hidden`) are excluded.
pub fn signature(document_id: &str, name: &str, nodes: &[Node], edges: &[Edge]) -> String {
    let nodes: Vec<ExportNode> = nodes.iter().map(export_node).collect();
    let edges: Vec<ExportEdge> = edges.iter().map(export_edge).collect();
    encode_signature(document_id, name, &nodes, &edges)
}

/// Signature of a document as it was handed to storage
pub fn signature_of_export(document: &ExportMap) -> String {
    encode_signature(
        &document.id,
        &document.metadata.name,
        &document.nodes,
        &document.edges,
    )
}

/// Result of one save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Storage confirmed the write of `signature` for `document_id`
    Saved {
        document_id: String,
        signature: String,
    },

    /// No document was loaded
    Skipped,

    /// Storage rejected the write
    Failed,
}

/// Debounce/throttle/in-flight bookkeeping, independent of any runtime.
///
/// Callers pass the current time and a fresh [`AutosaveView`] on every call.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    config: AutosaveConfig,
    document_id: Option<String>,
    generation: u64,
    baseline: Option<String>,
    in_flight: bool,
    last_attempt: Option<Instant>,
    deadline: Option<Instant>,
}

impl AutosaveScheduler {
    pub fn new(config: AutosaveConfig) -> Self {
        Self {
            config,
            document_id: None,
            generation: 0,
            baseline: None,
            in_flight: false,
            last_attempt: None,
            deadline: None,
        }
    }

    /// React to a state change
    pub fn observe(&mut self, view: &AutosaveView, now: Instant) {
        if !view.ready {
            return;
        }

        if !self.tracks(view) {
            debug!(document_id = %view.document_id, "Autosave baseline reset");
            self.document_id = Some(view.document_id.clone());
            self.generation = view.generation;
            self.baseline = Some(view.signature.clone());
            self.deadline = None;
            return;
        }

        if !self.is_dirty(view) || self.in_flight {
            return;
        }

        let debounced = now + self.config.debounce;
        let deadline = match self.last_attempt {
            Some(last) => debounced.max(last + self.config.floor()),
            None => debounced,
        };
        if deadline > debounced {
            debug!(
                deferred_ms = (deadline - debounced).as_millis() as u64,
                "Autosave deferred by throttle"
            );
        }
        self.deadline = Some(deadline);
    }

    /// Whether the deadline has passed and a save should start now.
    ///
    /// Marks the save as in flight when it returns `true`.
    pub fn take_due(&mut self, view: &AutosaveView, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {}
            _ => return false,
        }
        self.deadline = None;

        if self.in_flight || !self.is_dirty(view) {
            return false;
        }
        self.in_flight = true;
        self.last_attempt = Some(now);
        true
    }

    /// Record the outcome of the in-flight save
    pub fn finish(&mut self, outcome: &SaveOutcome, view: &AutosaveView, now: Instant) {
        self.in_flight = false;

        if let SaveOutcome::Saved {
            document_id,
            signature,
        } = outcome
        {
            if self.document_id.as_deref() == Some(document_id.as_str()) {
                self.baseline = Some(signature.clone());
            }
            // Edits made while the save was running
            self.observe(view, now);
        }
    }

    /// Whether `view` shows the same loaded document as the baseline
    fn tracks(&self, view: &AutosaveView) -> bool {
        self.document_id.as_deref() == Some(view.document_id.as_str())
            && self.generation == view.generation
    }

    pub fn is_dirty(&self, view: &AutosaveView) -> bool {
        view.ready && self.tracks(view) && self.baseline.as_deref() != Some(view.signature.as_str())
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn config(&self) -> &AutosaveConfig {
        &self.config
    }
}

enum Control {
    Flush(oneshot::Sender<Option<SaveOutcome>>),
    Shutdown { flush: bool },
}

/// Handle to a running autosave task
#[derive(Debug)]
pub struct AutosavePipeline {
    control: mpsc::UnboundedSender<Control>,
    task: JoinHandle<()>,
}

impl AutosavePipeline {
    /// Start observing `store`; must be called from within a tokio runtime.
    ///
    /// The current state becomes the baseline, so whatever is loaded at spawn
    /// time is not considered dirty.
    pub fn spawn(store: SharedStore, storage: Arc<dyn DocumentStorage>, config: AutosaveConfig) -> Self {
        let changes = store.subscribe();
        let mut scheduler = AutosaveScheduler::new(config);
        scheduler.observe(&store.read(DocumentStore::autosave_view), Instant::now());

        let (control, controls) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, storage, scheduler, changes, controls));

        info!(
            debounce_ms = config.debounce.as_millis() as u64,
            throttle_ms = config.floor().as_millis() as u64,
            "Autosave started"
        );
        Self { control, task }
    }

    /// Save now if the document is dirty, bypassing the timers.
    ///
    /// Waits for an in-flight save first. Returns `None` when nothing needed
    /// saving or the task is gone.
    pub async fn flush(&self) -> Option<SaveOutcome> {
        let (reply, response) = oneshot::channel();
        self.control.send(Control::Flush(reply)).ok()?;
        response.await.ok().flatten()
    }

    /// Stop the task, cancelling any pending deadline.
    ///
    /// With `flush`, the document is saved once more if still dirty.
    pub async fn shutdown(mut self, flush: bool) {
        let _ = self.control.send(Control::Shutdown { flush });
        if let Err(err) = (&mut self.task).await {
            warn!(error = %err, "Autosave task ended abnormally");
        }
    }
}

impl Drop for AutosavePipeline {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    store: SharedStore,
    storage: Arc<dyn DocumentStorage>,
    mut scheduler: AutosaveScheduler,
    mut changes: watch::Receiver<u64>,
    mut controls: mpsc::UnboundedReceiver<Control>,
) {
    let (done_tx, mut done_rx) = mpsc::channel::<SaveOutcome>(1);

    loop {
        let deadline = scheduler.deadline();

        tokio::select! {
            control = controls.recv() => match control {
                Some(Control::Flush(reply)) => {
                    let outcome = flush_pending(&store, storage.as_ref(), &mut scheduler, &mut done_rx).await;
                    let _ = reply.send(outcome);
                }
                Some(Control::Shutdown { flush }) => {
                    if flush {
                        flush_pending(&store, storage.as_ref(), &mut scheduler, &mut done_rx).await;
                    }
                    break;
                }
                None => break,
            },

            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                scheduler.observe(&store.read(DocumentStore::autosave_view), Instant::now());
            }

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let view = store.read(DocumentStore::autosave_view);
                if scheduler.take_due(&view, Instant::now()) {
                    debug!(document_id = %view.document_id, "Autosave triggered");
                    let store = store.clone();
                    let storage = Arc::clone(&storage);
                    let done = done_tx.clone();
                    tokio::spawn(async move {
                        let outcome = save_once(&store, storage.as_ref()).await;
                        let _ = done.send(outcome).await;
                    });
                }
            }

            Some(outcome) = done_rx.recv() => {
                let view = store.read(DocumentStore::autosave_view);
                scheduler.finish(&outcome, &view, Instant::now());
            }
        }
    }

    debug!("Autosave stopped");
}

/// Wait out any in-flight save, then save once if still dirty
async fn flush_pending(
    store: &SharedStore,
    storage: &dyn DocumentStorage,
    scheduler: &mut AutosaveScheduler,
    done_rx: &mut mpsc::Receiver<SaveOutcome>,
) -> Option<SaveOutcome> {
    if scheduler.is_in_flight() {
        if let Some(outcome) = done_rx.recv().await {
            let view = store.read(DocumentStore::autosave_view);
            scheduler.finish(&outcome, &view, Instant::now());
        }
    }

    let view = store.read(DocumentStore::autosave_view);
    scheduler.observe(&view, Instant::now());
    if !scheduler.is_dirty(&view) {
        return None;
    }

    debug!(document_id = %view.document_id, "Flushing dirty document");
    let outcome = save_once(store, storage).await;
    scheduler.finish(&outcome, &store.read(DocumentStore::autosave_view), Instant::now());
    Some(outcome)
}

async fn save_once(store: &SharedStore, storage: &dyn DocumentStorage) -> SaveOutcome {
    match store.save_current_document(storage).await {
        Ok(Some(saved)) => SaveOutcome::Saved {
            document_id: saved.id.clone(),
            signature: signature_of_export(&saved),
        },
        Ok(None) => SaveOutcome::Skipped,
        Err(err) => {
            warn!(error = %err, "Autosave failed");
            SaveOutcome::Failed
        }
    }
}
