//! # Canvas Change Batches
//!
//! Generic changes reported by the rendering surface (drag frames, resize
//! measurements, selection toggles, deletions). The store merges them into its
//! node and edge lists.
//!
//! ## Semantics
//!
//! - Changes referencing an unknown id are ignored
//! - A batch is "structural" if it contains anything besides selection toggles;
//!   only structural batches are recorded in history

use serde::{Deserialize, Serialize};

use crate::model::{Edge, Node, Position};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    /// Node moved (or a drag frame was reported)
    Position {
        id: String,
        #[serde(default)]
        position: Option<Position>,
        #[serde(default)]
        dragging: bool,
    },

    /// Rendered size measured
    Dimensions {
        id: String,
        width: f64,
        height: f64,
    },

    /// Selection toggled
    Select {
        id: String,
        selected: bool,
    },

    /// Node deleted from the canvas
    Remove {
        id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeChange {
    Select {
        id: String,
        selected: bool,
    },

    Remove {
        id: String,
    },
}

impl NodeChange {
    pub fn id(&self) -> &str {
        match self {
            NodeChange::Position { id, .. }
            | NodeChange::Dimensions { id, .. }
            | NodeChange::Select { id, .. }
            | NodeChange::Remove { id } => id,
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(self, NodeChange::Select { .. })
    }

    /// Merge this change into `nodes`
    pub fn apply(&self, nodes: &mut Vec<Node>) {
        match self {
            NodeChange::Remove { id } => nodes.retain(|node| &node.id != id),

            NodeChange::Position { id, position, .. } => {
                if let (Some(node), Some(position)) = (find_node(nodes, id), position) {
                    node.position = *position;
                }
            }

            NodeChange::Dimensions { id, width, height } => {
                if let Some(node) = find_node(nodes, id) {
                    node.width = Some(*width);
                    node.height = Some(*height);
                }
            }

            NodeChange::Select { id, selected } => {
                if let Some(node) = find_node(nodes, id) {
                    node.selected = *selected;
                }
            }
        }
    }
}

impl EdgeChange {
    pub fn id(&self) -> &str {
        match self {
            EdgeChange::Select { id, .. } | EdgeChange::Remove { id } => id,
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(self, EdgeChange::Select { .. })
    }

    /// Merge this change into `edges`
    pub fn apply(&self, edges: &mut Vec<Edge>) {
        match self {
            EdgeChange::Remove { id } => edges.retain(|edge| &edge.id != id),

            EdgeChange::Select { id, selected } => {
                if let Some(edge) = edges.iter_mut().find(|edge| &edge.id == id) {
                    edge.selected = *selected;
                }
            }
        }
    }
}

fn find_node<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    nodes.iter_mut().find(|node| node.id == id)
}

/// Whether a node batch should produce an undo step
pub fn has_structural_node_change(changes: &[NodeChange]) -> bool {
    changes.iter().any(|change| !change.is_selection())
}

/// Whether an edge batch should produce an undo step
pub fn has_structural_edge_change(changes: &[EdgeChange]) -> bool {
    changes.iter().any(|change| !change.is_selection())
}

/// Apply a node batch in order
pub fn apply_node_changes(changes: &[NodeChange], nodes: &mut Vec<Node>) {
    for change in changes {
        change.apply(nodes);
    }
}

/// Apply an edge batch in order
pub fn apply_edge_changes(changes: &[EdgeChange], edges: &mut Vec<Edge>) {
    for change in changes {
        change.apply(edges);
    }
}
