//! # Collapse Projection
//!
//! Derives which nodes and edges are hidden from the per-node `collapsed`
//! flags. Collapsing a node hides everything reachable from it along edge
//! direction, but never the collapsed node itself.
//!
//! The projection is recomputed on every read and never mutates its inputs.
//! Reachability uses an explicit stack and a visited set, so cycles,
//! self-loops and dangling edge endpoints terminate and contribute nothing
//! beyond the nodes that actually exist on a path.

use std::collections::{HashMap, HashSet};

use crate::model::{Edge, Node};

/// Render-ready copy of the graph with `hidden` flags filled in
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Projection {
    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.hidden)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| !edge.hidden)
    }

    pub fn hidden_node_ids(&self) -> HashSet<&str> {
        self.nodes
            .iter()
            .filter(|node| node.hidden)
            .map(|node| node.id.as_str())
            .collect()
    }
}

/// Forward adjacency (`source` → targets in edge order)
pub fn adjacency(edges: &[Edge]) -> HashMap<&str, Vec<&str>> {
    let mut map: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        map.entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }
    map
}

/// Every node id reachable from `root_id`, excluding `root_id` itself
pub fn descendants<'a>(root_id: &str, adjacency: &HashMap<&str, Vec<&'a str>>) -> HashSet<&'a str> {
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut stack: Vec<&'a str> = adjacency.get(root_id).cloned().unwrap_or_default();

    while let Some(next) = stack.pop() {
        if next == root_id || !visited.insert(next) {
            continue;
        }
        if let Some(children) = adjacency.get(next) {
            stack.extend(children.iter().copied().filter(|child| !visited.contains(child)));
        }
    }

    visited
}

/// Union of the descendant sets of every collapsed node
pub fn hidden_ids<'a>(nodes: &[Node], edges: &'a [Edge]) -> HashSet<&'a str> {
    let adjacency = adjacency(edges);
    let mut hidden = HashSet::new();

    for node in nodes.iter().filter(|node| node.data.collapsed) {
        hidden.extend(descendants(&node.id, &adjacency));
    }

    hidden
}

/// Annotate copies of `nodes` and `edges` with their derived `hidden` flag
pub fn project(nodes: &[Node], edges: &[Edge]) -> Projection {
    let hidden = hidden_ids(nodes, edges);

    let nodes = nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            node.hidden = hidden.contains(node.id.as_str());
            node
        })
        .collect();

    let edges = edges
        .iter()
        .map(|edge| {
            let mut edge = edge.clone();
            edge.hidden =
                hidden.contains(edge.source.as_str()) || hidden.contains(edge.target.as_str());
            edge
        })
        .collect();

    Projection { nodes, edges }
}
