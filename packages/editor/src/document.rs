//! # Document Store
//!
//! The authoritative editing state for one open concept map: nodes, edges,
//! metadata, selection, drag bracket and undo history.
//!
//! ## Recording rules
//!
//! Every operation that changes the graph structurally or semantically first
//! captures a snapshot of the pre-mutation graph into the history stack.
//! Selection changes, renames and document loads are never recorded.
//!
//! ```text
//! command → DocumentStore::op → snapshot → mutate → revision += 1
//!                                                        ↓
//!                                  project() for rendering, autosave_view() for autosave
//! ```
//!
//! ## Drag gestures
//!
//! `start_drag` captures one snapshot; position changes reported while the
//! drag is active mutate the graph without recording; `end_drag` commits the
//! pre-drag snapshot as a single undo step.
//!
//! Operations that reference ids which do not exist are silent no-ops.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::autosave::{signature, AutosaveView};
use crate::changes::{self, has_structural_edge_change, has_structural_node_change, EdgeChange, NodeChange};
use crate::collapse::{self, Projection};
use crate::model::{
    DocumentMetadata, DocumentSummary, Edge, Node, Position, StylePatch, CHILD_HORIZONTAL_GAP,
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, VERTICAL_GAP,
};
use crate::schema::{build_export_map, hydrate, ExportMap, SCHEMA_VERSION};
use crate::snapshot::GraphSnapshot;
use crate::undo_stack::HistoryStack;

/// Name shown before any document has been created or loaded
pub const INITIAL_DOCUMENT_NAME: &str = "ConceptMap Infinity";

/// Prefix of generated document names (`"Map 2024-05-01"`)
pub const DEFAULT_NAME_PREFIX: &str = "Map";

/// Editable concept map state
#[derive(Debug)]
pub struct DocumentStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    metadata: DocumentMetadata,

    /// Schema version of the current document, written back unchanged
    version: u32,

    /// Summaries of every known document (for the document picker)
    documents: Vec<DocumentSummary>,

    /// Primary selection as reported by the canvas
    selected_node_id: Option<String>,
    selected_edge_id: Option<String>,

    history: HistoryStack,

    dragging: bool,
    drag_snapshot: Option<GraphSnapshot>,

    /// Set once a document has been created or loaded
    ready: bool,

    /// Increments on every new or loaded document
    generation: u64,

    /// Increments on every observable state change
    revision: u64,
}

impl DocumentStore {
    /// Create an empty, not-yet-ready store
    pub fn new() -> Self {
        Self::with_history(HistoryStack::new())
    }

    /// Create a store whose history keeps at most `limit` undo levels
    pub fn with_history_limit(limit: usize) -> Self {
        Self::with_history(HistoryStack::with_max_levels(limit))
    }

    fn with_history(history: HistoryStack) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: DocumentMetadata {
                name: INITIAL_DOCUMENT_NAME.to_string(),
                ..Default::default()
            },
            version: SCHEMA_VERSION,
            documents: Vec::new(),
            selected_node_id: None,
            selected_edge_id: None,
            history,
            dragging: false,
            drag_snapshot: None,
            ready: false,
            generation: 0,
            revision: 0,
        }
    }

    // ------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------

    /// Start a fresh document with a single selected root node at the origin
    pub fn new_document(&mut self, name: Option<&str>) -> &DocumentMetadata {
        let now = Utc::now();
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} {}", DEFAULT_NAME_PREFIX, now.format("%Y-%m-%d")),
        };

        let root = Node::concept(Position::default(), None).with_selected(true);

        self.metadata = DocumentMetadata {
            id: crate::model::new_id(),
            name,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        self.version = SCHEMA_VERSION;
        self.documents
            .insert(0, DocumentSummary::from(&self.metadata));
        self.selected_node_id = Some(root.id.clone());
        self.selected_edge_id = None;
        self.nodes = vec![root];
        self.edges = Vec::new();
        self.reset_transient_state();
        self.touch();

        info!(document_id = %self.metadata.id, name = %self.metadata.name, "Created new document");
        &self.metadata
    }

    /// Replace the whole document with `document`. Never recorded in history.
    pub fn load_document(&mut self, document: &ExportMap) {
        let hydrated = hydrate(document);

        self.nodes = hydrated.nodes;
        self.edges = hydrated.edges;
        self.metadata = hydrated.metadata;
        self.version = hydrated.version;
        self.clear_selection();
        self.reset_transient_state();
        self.touch();

        info!(
            document_id = %self.metadata.id,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Loaded document"
        );
    }

    fn reset_transient_state(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.history.clear();
        self.dragging = false;
        self.drag_snapshot = None;
        self.ready = true;
    }

    /// Rename the current document. Blank names are ignored.
    pub fn rename_document(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }

        self.metadata.name = trimmed.to_string();
        let id = self.metadata.id.clone();
        if let Some(summary) = self.documents.iter_mut().find(|doc| doc.id == id) {
            summary.name = trimmed.to_string();
        }
        self.touch();
        true
    }

    /// Replace the list of known documents
    pub fn set_documents(&mut self, documents: Vec<DocumentSummary>) {
        self.documents = documents;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Canvas change batches
    // ------------------------------------------------------------------

    pub fn apply_node_changes(&mut self, batch: &[NodeChange]) {
        if batch.is_empty() {
            return;
        }
        if !self.dragging && has_structural_node_change(batch) {
            self.record();
        }
        changes::apply_node_changes(batch, &mut self.nodes);
        self.touch();
    }

    pub fn apply_edge_changes(&mut self, batch: &[EdgeChange]) {
        if batch.is_empty() {
            return;
        }
        if !self.dragging && has_structural_edge_change(batch) {
            self.record();
        }
        changes::apply_edge_changes(batch, &mut self.edges);
        self.touch();
    }

    /// Record the canvas selection (first node / first edge become primary)
    pub fn select_from_selection(&mut self, node_ids: &[String], edge_ids: &[String]) {
        self.selected_node_id = node_ids.first().cloned();
        self.selected_edge_id = edge_ids.first().cloned();
        self.touch();
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Connect `source` → `target`; returns the new edge id.
    ///
    /// The first connection into a node establishes its logical parent;
    /// later connections never override it. Missing endpoints and duplicate
    /// connections are no-ops.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<String> {
        if self.node(source).is_none() || self.node(target).is_none() {
            return None;
        }
        if self
            .edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
        {
            return None;
        }

        self.record();
        let edge = Edge::connect(source, target);
        let edge_id = edge.id.clone();
        self.edges.push(edge);

        if let Some(node) = self.node_mut(target) {
            if node.data.parent_id.is_none() {
                node.data.parent_id = Some(source.to_string());
            }
        }
        self.touch();
        Some(edge_id)
    }

    /// Insert an unparented node at `position` and select it
    pub fn add_node_at(&mut self, position: Position) -> String {
        self.record();
        self.insert_selected(Node::concept(position, None), None)
    }

    /// Add a child to the right of `parent_id`, stacked below existing children
    pub fn add_child_node(&mut self, parent_id: &str) -> Option<String> {
        let parent = self.node(parent_id)?.position;
        let y = match self.lowest_child_y(parent_id) {
            Some(lowest) => lowest + DEFAULT_NODE_HEIGHT + VERTICAL_GAP,
            None => parent.y,
        };
        let position = Position::new(parent.x + DEFAULT_NODE_WIDTH + CHILD_HORIZONTAL_GAP, y);

        self.record();
        let node = Node::concept(position, Some(parent_id.to_string()));
        Some(self.insert_selected(node, Some(parent_id)))
    }

    /// Add a sibling of `node_id` (same parent), placed below the existing siblings
    pub fn add_sibling_node(&mut self, node_id: &str) -> Option<String> {
        let reference = self.node(node_id)?;
        let origin = reference.position;
        let parent_id = reference.data.parent_id.clone();

        self.record();
        let id = match parent_id {
            None => {
                let position = Position::new(origin.x, origin.y + DEFAULT_NODE_HEIGHT + VERTICAL_GAP);
                self.insert_selected(Node::concept(position, None), None)
            }
            Some(parent_id) => {
                let lowest = self.lowest_child_y(&parent_id).unwrap_or(origin.y);
                let position = Position::new(origin.x, lowest + DEFAULT_NODE_HEIGHT + VERTICAL_GAP);
                let node = Node::concept(position, Some(parent_id.clone()));
                self.insert_selected(node, Some(&parent_id))
            }
        };
        Some(id)
    }

    /// Push `node` as the only selected node, optionally connected from `parent_id`
    fn insert_selected(&mut self, node: Node, parent_id: Option<&str>) -> String {
        for existing in &mut self.nodes {
            existing.selected = false;
        }

        let node = node.with_selected(true);
        let id = node.id.clone();
        if let Some(parent_id) = parent_id {
            self.edges.push(Edge::connect(parent_id, &id));
        }
        self.nodes.push(node);

        self.selected_node_id = Some(id.clone());
        self.selected_edge_id = None;
        self.touch();

        debug!(node_id = %id, parent_id = ?parent_id, "Inserted node");
        id
    }

    /// y of the lowest node targeted by an edge from `parent_id`
    fn lowest_child_y(&self, parent_id: &str) -> Option<f64> {
        let children: HashSet<&str> = self
            .edges
            .iter()
            .filter(|edge| edge.source == parent_id)
            .map(|edge| edge.target.as_str())
            .collect();

        self.nodes
            .iter()
            .filter(|node| children.contains(node.id.as_str()))
            .map(|node| node.position.y)
            .reduce(f64::max)
    }

    pub fn update_node_label(&mut self, id: &str, label: &str) -> bool {
        match self.node(id) {
            Some(node) if node.data.label != label => {}
            _ => return false,
        }

        self.record();
        if let Some(node) = self.node_mut(id) {
            node.data.label = label.to_string();
        }
        self.touch();
        true
    }

    pub fn update_node_style(&mut self, id: &str, patch: &StylePatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let Some(node) = self.node(id) else {
            return false;
        };
        let mut style = node.data.style.clone();
        style.merge(patch);
        if style == node.data.style {
            return false;
        }

        self.record();
        if let Some(node) = self.node_mut(id) {
            node.data.style = style;
        }
        self.touch();
        true
    }

    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }

        self.record();
        if let Some(node) = self.node_mut(id) {
            node.data.collapsed = !node.data.collapsed;
        }
        self.touch();
        true
    }

    /// Delete selected nodes and edges, plus every edge touching a deleted node
    pub fn remove_selection(&mut self) -> bool {
        let removed_nodes: HashSet<String> = self
            .nodes
            .iter()
            .filter(|node| node.selected)
            .map(|node| node.id.clone())
            .collect();
        let removed_edges: HashSet<String> = self
            .edges
            .iter()
            .filter(|edge| edge.selected)
            .map(|edge| edge.id.clone())
            .collect();

        if removed_nodes.is_empty() && removed_edges.is_empty() {
            return false;
        }

        self.record();
        self.nodes.retain(|node| !removed_nodes.contains(&node.id));
        self.edges.retain(|edge| {
            !removed_edges.contains(&edge.id)
                && !removed_nodes.iter().any(|id| edge.touches(id))
        });
        self.clear_selection();
        self.touch();

        debug!(
            nodes = removed_nodes.len(),
            edges = removed_edges.len(),
            "Removed selection"
        );
        true
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.nodes, &self.edges) else {
            return false;
        };
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.nodes, &self.edges) else {
            return false;
        };
        self.restore(next);
        true
    }

    fn restore(&mut self, snapshot: GraphSnapshot) {
        let (nodes, edges) = snapshot.into_parts();
        self.nodes = nodes;
        self.edges = edges;
        self.clear_selection();
        self.touch();
    }

    fn record(&mut self) {
        self.history
            .record(GraphSnapshot::capture(&self.nodes, &self.edges));
        debug!(undo_levels = self.history.undo_levels(), "Recorded history snapshot");
    }

    /// Begin a drag gesture; the pre-drag graph becomes the gesture's undo step
    pub fn start_drag(&mut self) {
        if self.dragging {
            return;
        }
        self.dragging = true;
        self.drag_snapshot = Some(GraphSnapshot::capture(&self.nodes, &self.edges));
    }

    /// End a drag gesture, committing the pre-drag snapshot
    pub fn end_drag(&mut self) {
        self.dragging = false;
        if let Some(snapshot) = self.drag_snapshot.take() {
            self.history.record(snapshot);
            self.touch();
        }
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Build the representation to persist, stamped with `updated_at`.
    ///
    /// `None` when no document is loaded.
    pub fn prepare_save(&self, updated_at: &str) -> Option<ExportMap> {
        if self.metadata.id.is_empty() {
            return None;
        }
        let metadata = DocumentMetadata {
            updated_at: updated_at.to_string(),
            ..self.metadata.clone()
        };
        Some(build_export_map(
            &metadata,
            &self.nodes,
            &self.edges,
            self.version,
        ))
    }

    /// Apply the bookkeeping of a confirmed save
    pub fn commit_save(&mut self, saved: &ExportMap) {
        if self.metadata.id == saved.id {
            self.metadata.updated_at = saved.metadata.updated_at.clone();
        }
        if let Some(summary) = self.documents.iter_mut().find(|doc| doc.id == saved.id) {
            summary.name = saved.metadata.name.clone();
            summary.updated_at = saved.metadata.updated_at.clone();
        }
        self.touch();
    }

    /// Current document as it would be exported right now
    pub fn export(&self) -> Option<ExportMap> {
        self.prepare_save(&crate::model::now_iso())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Render-ready graph with collapse applied
    pub fn project(&self) -> Projection {
        collapse::project(&self.nodes, &self.edges)
    }

    /// Dirty-tracking inputs for the autosave pipeline
    pub fn autosave_view(&self) -> AutosaveView {
        AutosaveView {
            ready: self.ready,
            document_id: self.metadata.id.clone(),
            generation: self.generation,
            signature: signature(&self.metadata.id, &self.metadata.name, &self.nodes, &self.edges),
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(&self.nodes, &self.edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    pub fn selected_edge_id(&self) -> Option<&str> {
        self.selected_edge_id.as_deref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn clear_selection(&mut self) {
        self.selected_node_id = None;
        self.selected_edge_id = None;
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.new_document(Some("Test"));
        store
    }

    fn root_id(store: &DocumentStore) -> String {
        store.nodes()[0].id.clone()
    }

    #[test]
    fn test_new_store_is_not_ready() {
        let store = DocumentStore::new();
        assert!(!store.is_ready());
        assert_eq!(store.metadata().name, INITIAL_DOCUMENT_NAME);
        assert!(store.metadata().id.is_empty());
        assert!(store.prepare_save("now").is_none());
    }

    #[test]
    fn test_new_document_creates_selected_root() {
        let store = ready_store();

        assert!(store.is_ready());
        assert_eq!(store.nodes().len(), 1);
        assert!(store.edges().is_empty());

        let root = &store.nodes()[0];
        assert!(root.selected);
        assert_eq!(root.position, Position::default());
        assert_eq!(root.parent_id(), None);
        assert_eq!(store.selected_node_id(), Some(root.id.as_str()));
        assert!(!store.history().can_undo());
        assert_eq!(store.documents().len(), 1);
        assert_eq!(store.documents()[0].id, store.metadata().id);
    }

    #[test]
    fn test_new_document_default_name() {
        let mut store = DocumentStore::new();
        store.new_document(Some("   "));

        let name = &store.metadata().name;
        assert!(name.starts_with("Map "));
        assert_eq!(name.len(), "Map 2024-01-01".len());
    }

    #[test]
    fn test_rename_trims_and_ignores_blank() {
        let mut store = ready_store();

        assert!(!store.rename_document("   "));
        assert_eq!(store.metadata().name, "Test");

        assert!(store.rename_document("  Cells  "));
        assert_eq!(store.metadata().name, "Cells");
        assert_eq!(store.documents()[0].name, "Cells");
        assert!(!store.history().can_undo());
    }

    #[test]
    fn test_connect_sets_parent_once() {
        let mut store = ready_store();
        let root = root_id(&store);
        let a = store.add_node_at(Position::new(0.0, 200.0));
        let b = store.add_node_at(Position::new(400.0, 0.0));

        assert!(store.connect(&root, &b).is_some());
        assert!(store.connect(&a, &b).is_some());

        assert_eq!(store.node(&b).unwrap().parent_id(), Some(root.as_str()));
        assert_eq!(store.edges().len(), 2);
    }

    #[test]
    fn test_connect_ignores_missing_and_duplicate() {
        let mut store = ready_store();
        let root = root_id(&store);
        let child = store.add_node_at(Position::new(300.0, 0.0));
        let levels = store.history().undo_levels();

        assert!(store.connect(&root, "ghost").is_none());
        assert!(store.connect(&root, &child).is_some());
        assert!(store.connect(&root, &child).is_none());
        assert_eq!(store.history().undo_levels(), levels + 1);
    }

    #[test]
    fn test_add_child_positions() {
        let mut store = ready_store();
        let root = root_id(&store);

        let first = store.add_child_node(&root).unwrap();
        let first_pos = store.node(&first).unwrap().position;
        assert_eq!(first_pos.x, DEFAULT_NODE_WIDTH + CHILD_HORIZONTAL_GAP);
        assert_eq!(first_pos.y, 0.0);

        let second = store.add_child_node(&root).unwrap();
        let second_pos = store.node(&second).unwrap().position;
        assert_eq!(second_pos.y, DEFAULT_NODE_HEIGHT + VERTICAL_GAP);
        assert_eq!(store.node(&second).unwrap().parent_id(), Some(root.as_str()));

        let selected: Vec<&str> = store
            .nodes()
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(selected, vec![second.as_str()]);
    }

    #[test]
    fn test_add_child_to_missing_parent_is_noop() {
        let mut store = ready_store();
        let revision = store.revision();

        assert!(store.add_child_node("ghost").is_none());
        assert_eq!(store.revision(), revision);
        assert!(!store.history().can_undo());
    }

    #[test]
    fn test_add_sibling_of_root_is_unparented() {
        let mut store = ready_store();
        let root = root_id(&store);

        let sibling = store.add_sibling_node(&root).unwrap();
        let node = store.node(&sibling).unwrap();

        assert_eq!(node.parent_id(), None);
        assert_eq!(node.position, Position::new(0.0, DEFAULT_NODE_HEIGHT + VERTICAL_GAP));
        assert!(store.edges().is_empty());
    }

    #[test]
    fn test_add_sibling_shares_parent() {
        let mut store = ready_store();
        let root = root_id(&store);
        let child = store.add_child_node(&root).unwrap();

        let sibling = store.add_sibling_node(&child).unwrap();
        let node = store.node(&sibling).unwrap();

        assert_eq!(node.parent_id(), Some(root.as_str()));
        assert_eq!(node.position.y, DEFAULT_NODE_HEIGHT + VERTICAL_GAP);
        assert!(store
            .edges()
            .iter()
            .any(|edge| edge.source == root && edge.target == sibling));
    }

    #[test]
    fn test_label_and_style_updates() {
        let mut store = ready_store();
        let root = root_id(&store);

        assert!(store.update_node_label(&root, "Cell"));
        assert!(!store.update_node_label(&root, "Cell"));
        assert!(!store.update_node_label("ghost", "x"));
        assert_eq!(store.node(&root).unwrap().data.label, "Cell");

        let patch = StylePatch {
            border_width: Some(4),
            ..Default::default()
        };
        assert!(store.update_node_style(&root, &patch));
        assert!(!store.update_node_style(&root, &patch));
        assert_eq!(store.node(&root).unwrap().data.style.border_width, 4);
        assert!(!store.update_node_style(&root, &StylePatch::default()));
        assert_eq!(store.history().undo_levels(), 2);
    }

    #[test]
    fn test_toggle_collapse_flips_flag() {
        let mut store = ready_store();
        let root = root_id(&store);

        assert!(store.toggle_collapse(&root));
        assert!(store.node(&root).unwrap().data.collapsed);
        assert!(store.toggle_collapse(&root));
        assert!(!store.node(&root).unwrap().data.collapsed);
        assert!(!store.toggle_collapse("ghost"));
    }

    #[test]
    fn test_projection_hides_collapsed_children() {
        let mut store = ready_store();
        let root = root_id(&store);
        let child = store.add_child_node(&root).unwrap();
        store.toggle_collapse(&root);

        let projection = store.project();
        assert!(projection.nodes.iter().any(|n| n.id == child && n.hidden));
        assert!(projection.nodes.iter().any(|n| n.id == root && !n.hidden));
        // Live state is never annotated
        assert!(store.nodes().iter().all(|n| !n.hidden));
    }

    #[test]
    fn test_remove_selection_cleans_orphan_edges() {
        let mut store = ready_store();
        let root = root_id(&store);
        let child = store.add_child_node(&root).unwrap();
        store.add_child_node(&child).unwrap();

        // Select only the middle node
        store.apply_node_changes(&[
            NodeChange::Select { id: store.nodes()[2].id.clone(), selected: false },
            NodeChange::Select { id: child.clone(), selected: true },
        ]);

        assert!(store.remove_selection());
        assert_eq!(store.nodes().len(), 2);
        assert!(store.edges().is_empty());
        assert_eq!(store.selected_node_id(), None);
    }

    #[test]
    fn test_remove_selection_without_selection_is_noop() {
        let mut store = ready_store();
        let root = root_id(&store);
        store.apply_node_changes(&[NodeChange::Select { id: root, selected: false }]);
        let before = store.snapshot();
        let levels = store.history().undo_levels();

        assert!(!store.remove_selection());
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.history().undo_levels(), levels);
    }

    #[test]
    fn test_selection_changes_are_not_recorded() {
        let mut store = ready_store();
        let root = root_id(&store);

        store.apply_node_changes(&[NodeChange::Select { id: root.clone(), selected: false }]);
        store.select_from_selection(&[root.clone()], &[]);

        assert!(!store.history().can_undo());
        assert_eq!(store.selected_node_id(), Some(root.as_str()));
    }

    #[test]
    fn test_drag_collapses_to_single_undo_step() {
        let mut store = ready_store();
        let root = root_id(&store);

        store.start_drag();
        for i in 1..=30 {
            store.apply_node_changes(&[NodeChange::Position {
                id: root.clone(),
                position: Some(Position::new(i as f64, i as f64 * 2.0)),
                dragging: true,
            }]);
        }
        assert!(!store.history().can_undo());
        store.end_drag();

        assert_eq!(store.history().undo_levels(), 1);
        assert_eq!(store.node(&root).unwrap().position, Position::new(30.0, 60.0));

        store.undo();
        assert_eq!(store.node(&root).unwrap().position, Position::default());
    }

    #[test]
    fn test_end_drag_without_start_records_nothing() {
        let mut store = ready_store();
        store.end_drag();
        assert!(!store.history().can_undo());
        assert!(!store.is_dragging());
    }

    #[test]
    fn test_load_resets_history_and_drag() {
        let mut store = ready_store();
        let root = root_id(&store);
        store.add_child_node(&root);
        store.start_drag();
        let exported = store.export().unwrap();

        let mut other = DocumentStore::new();
        other.new_document(Some("Other"));
        other.add_node_at(Position::new(1.0, 1.0));
        other.start_drag();
        other.load_document(&exported);

        assert!(other.is_ready());
        assert!(!other.is_dragging());
        assert!(!other.history().can_undo());
        assert_eq!(other.selected_node_id(), None);
        assert_eq!(other.metadata().id, store.metadata().id);
        assert_eq!(other.nodes().len(), 2);
    }

    #[test]
    fn test_commit_save_updates_metadata_and_list() {
        let mut store = ready_store();
        let saved = store.prepare_save("2030-01-01T00:00:00.000Z").unwrap();

        store.commit_save(&saved);

        assert_eq!(store.metadata().updated_at, "2030-01-01T00:00:00.000Z");
        assert_eq!(store.documents()[0].updated_at, "2030-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_loaded_version_is_written_back_unchanged() {
        let store = ready_store();
        let mut document = store.export().unwrap();
        document.version = 7;

        let mut other = DocumentStore::new();
        other.load_document(&document);

        assert_eq!(other.version(), 7);
        assert_eq!(other.export().unwrap().version, 7);
        assert_eq!(other.prepare_save("2030-01-01T00:00:00.000Z").unwrap().version, 7);

        other.new_document(None);
        assert_eq!(other.export().unwrap().version, SCHEMA_VERSION);
    }
}
