//! # ConceptMap Editor
//!
//! Core document engine for ConceptMap.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ command (CLI, canvas, shortcuts)            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ DocumentStore: graph state + operations     │
//! │  - Records pre-mutation snapshots           │
//! │  - Drag gestures collapse to one undo step  │
//! │  - HistoryStack: bounded undo/redo          │
//! └─────────────────────────────────────────────┘
//!          ↓ project()              ↓ watch
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ collapse: hidden     │  │ AutosavePipeline:    │
//! │ flags for rendering  │  │ debounced, throttled │
//! └──────────────────────┘  │ saves via storage    │
//!                           └──────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Store owns the graph**: everything else reads it or a copy of it
//! 2. **Hidden is derived**: collapse state is stored, visibility never is
//! 3. **Snapshots are independent**: nothing done to the live graph can reach history
//! 4. **Autosave reads live state**: timers never act on captured values
//!
//! ## Usage
//!
//! ```rust,ignore
//! use conceptmap_editor::{AutosaveConfig, AutosavePipeline, DocumentStore, MemoryStorage, SharedStore};
//!
//! let store = SharedStore::new(DocumentStore::new());
//! store.update(|s| { s.new_document(Some("Biology")); });
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let autosave = AutosavePipeline::spawn(store.clone(), storage, AutosaveConfig::default());
//!
//! let root = store.read(|s| s.nodes()[0].id.clone());
//! store.update(|s| s.add_child_node(&root));
//!
//! let visible = store.read(|s| s.project().visible_nodes().count());
//!
//! autosave.shutdown(true).await;
//! ```

mod autosave;
mod bounds;
mod changes;
mod collapse;
mod document;
mod errors;
mod model;
mod schema;
mod shared;
mod snapshot;
mod storage;
mod undo_stack;

pub use autosave::{
    signature, signature_of_export, AutosaveConfig, AutosavePipeline, AutosaveScheduler,
    AutosaveView, SaveOutcome, DEFAULT_DEBOUNCE, DEFAULT_THROTTLE,
};
pub use bounds::{graph_bounds, graph_bounds_with, GraphBounds};
pub use changes::{
    apply_edge_changes, apply_node_changes, has_structural_edge_change,
    has_structural_node_change, EdgeChange, NodeChange,
};
pub use collapse::{descendants, hidden_ids, project, Projection};
pub use document::{DocumentStore, DEFAULT_NAME_PREFIX, INITIAL_DOCUMENT_NAME};
pub use errors::EditorError;
pub use model::*;
pub use schema::{
    build_export_map, export_edge, export_node, hydrate, safe_file_name, ExportEdge, ExportMap,
    ExportNode, ExportNodeData, ExportStyle, HydratedDocument, FALLBACK_FILE_NAME, SCHEMA_VERSION,
};
pub use shared::SharedStore;
pub use snapshot::GraphSnapshot;
pub use storage::{sort_recent_first, DocumentStorage, MemoryStorage, StorageError, StorageResult};
pub use undo_stack::{HistoryStack, HISTORY_LIMIT};
