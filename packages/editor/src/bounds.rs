//! Bounding box of a set of nodes, used to frame a document.

use serde::Serialize;

use crate::model::{Node, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Bounds using the default node size for unmeasured nodes
pub fn graph_bounds<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> GraphBounds {
    graph_bounds_with(nodes, DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT)
}

pub fn graph_bounds_with<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    fallback_width: f64,
    fallback_height: f64,
) -> GraphBounds {
    let mut extent: Option<(f64, f64, f64, f64)> = None;

    for node in nodes {
        let left = node.position.x;
        let top = node.position.y;
        let right = left + node.width.unwrap_or(fallback_width);
        let bottom = top + node.height.unwrap_or(fallback_height);

        extent = Some(match extent {
            None => (left, top, right, bottom),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(left), min_y.min(top), max_x.max(right), max_y.max(bottom))
            }
        });
    }

    let (min_x, min_y, max_x, max_y) = extent.unwrap_or((0.0, 0.0, fallback_width, fallback_height));
    GraphBounds {
        min_x,
        min_y,
        max_x,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn test_empty_uses_fallback() {
        let bounds = graph_bounds_with(std::iter::empty(), 100.0, 50.0);
        assert_eq!(
            bounds,
            GraphBounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 50.0, width: 100.0, height: 50.0 }
        );
    }

    #[test]
    fn test_measured_and_unmeasured_nodes() {
        let a = Node::concept(Position::new(-10.0, 20.0), None);
        let mut b = Node::concept(Position::new(300.0, -40.0), None);
        b.width = Some(50.0);
        b.height = Some(30.0);

        let bounds = graph_bounds([&a, &b]);

        assert_eq!(bounds.min_x, -10.0);
        assert_eq!(bounds.min_y, -40.0);
        assert_eq!(bounds.max_x, 350.0);
        assert_eq!(bounds.max_y, 20.0 + DEFAULT_NODE_HEIGHT);
        assert_eq!(bounds.width, 360.0);
    }
}
