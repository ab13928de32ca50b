//! # Undo/Redo History
//!
//! Snapshot-based history for the document graph.
//!
//! ## Design
//!
//! - Every recorded mutation pushes the pre-mutation snapshot onto `past`
//! - Undo pops `past`, pushes the live graph onto `future` and restores the popped snapshot
//! - Redo does the opposite
//! - Recording a new mutation clears `future` (no branching history)
//! - `past` is bounded; the oldest snapshot is evicted first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = HistoryStack::new();
//!
//! history.record(GraphSnapshot::capture(&nodes, &edges));
//! // ... mutate nodes/edges ...
//!
//! if let Some(previous) = history.undo(&nodes, &edges) {
//!     (nodes, edges) = previous.into_parts();
//! }
//! ```

use std::collections::VecDeque;

use crate::model::{Edge, Node};
use crate::snapshot::GraphSnapshot;

/// Default number of undo levels kept
pub const HISTORY_LIMIT: usize = 120;

/// Bounded undo/redo snapshot stacks
#[derive(Debug, Clone)]
pub struct HistoryStack {
    /// Snapshots taken before each recorded mutation (most recent last)
    past: VecDeque<GraphSnapshot>,

    /// Snapshots replaced by undo (most recently undone last)
    future: Vec<GraphSnapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl HistoryStack {
    /// Create a history with the default limit (120)
    pub fn new() -> Self {
        Self::with_max_levels(HISTORY_LIMIT)
    }

    /// Create a history with a custom limit
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            max_levels,
        }
    }

    /// Record a pre-mutation snapshot; invalidates the redo stack
    pub fn record(&mut self, snapshot: GraphSnapshot) {
        self.push_past(snapshot);
        self.future.clear();
    }

    fn push_past(&mut self, snapshot: GraphSnapshot) {
        self.past.push_back(snapshot);

        if self.max_levels > 0 {
            while self.past.len() > self.max_levels {
                self.past.pop_front();
            }
        }
    }

    /// Step back one recorded mutation.
    ///
    /// Returns the snapshot to restore, or `None` when there is nothing to undo.
    /// The current graph is captured onto the redo stack only when a step exists.
    pub fn undo(&mut self, nodes: &[Node], edges: &[Edge]) -> Option<GraphSnapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(GraphSnapshot::capture(nodes, edges));
        Some(previous)
    }

    /// Replay the most recently undone step
    pub fn redo(&mut self, nodes: &[Node], edges: &[Edge]) -> Option<GraphSnapshot> {
        let next = self.future.pop()?;
        self.push_past(GraphSnapshot::capture(nodes, edges));
        Some(next)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Recorded snapshots, oldest first
    pub fn past(&self) -> impl Iterator<Item = &GraphSnapshot> {
        self.past.iter()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}
