//! # Graph Snapshots
//!
//! Independent copies of the node and edge lists, used by the history stack.
//! A snapshot owns every string it holds, so nothing done to the live graph
//! afterwards can reach into it.

use crate::model::{Edge, EdgeMarker, Node, NodeData, NodeStyle};

/// Full copy of the graph at one instant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Deep-copy the given graph
    pub fn capture(nodes: &[Node], edges: &[Edge]) -> Self {
        Self {
            nodes: nodes.iter().map(clone_node).collect(),
            edges: edges.iter().map(clone_edge).collect(),
        }
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

pub fn clone_node(node: &Node) -> Node {
    Node {
        id: node.id.clone(),
        position: node.position,
        width: node.width,
        height: node.height,
        selected: node.selected,
        hidden: node.hidden,
        data: NodeData {
            label: node.data.label.clone(),
            style: NodeStyle {
                bg_color: node.data.style.bg_color.clone(),
                border_color: node.data.style.border_color.clone(),
                border_width: node.data.style.border_width,
                icon: node.data.style.icon.clone(),
            },
            collapsed: node.data.collapsed,
            parent_id: node.data.parent_id.clone(),
        },
    }
}

pub fn clone_edge(edge: &Edge) -> Edge {
    Edge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        edge_type: edge.edge_type.clone(),
        marker_end: EdgeMarker {
            kind: edge.marker_end.kind,
        },
        selected: edge.selected,
        hidden: edge.hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn test_capture_is_deep_equal() {
        let a = Node::concept(Position::new(0.0, 0.0), None);
        let b = Node::concept(Position::new(300.0, 0.0), Some(a.id.clone()));
        let edge = Edge::connect(&a.id, &b.id);

        let nodes = vec![a, b];
        let edges = vec![edge];
        let snapshot = GraphSnapshot::capture(&nodes, &edges);

        assert_eq!(snapshot.nodes, nodes);
        assert_eq!(snapshot.edges, edges);
    }

    #[test]
    fn test_snapshot_is_independent_of_live_graph() {
        let mut nodes = vec![Node::concept(Position::new(0.0, 0.0), None)];
        let edges = vec![];
        let snapshot = GraphSnapshot::capture(&nodes, &edges);

        nodes[0].data.label = "Changed".to_string();
        nodes[0].data.style.bg_color = "#000000".to_string();
        nodes[0].position.x = 99.0;

        assert_eq!(snapshot.nodes[0].data.label, "Idea");
        assert_ne!(snapshot.nodes[0].data.style.bg_color, "#000000");
        assert_eq!(snapshot.nodes[0].position.x, 0.0);
    }
}
