//! # Export Schema
//!
//! The versioned document shape handed to storage and written by JSON export:
//!
//! ```text
//! { id, version, metadata: {id, name, createdAt, updatedAt},
//!   nodes: [{id, type: "concept", position, data: {label, style, collapsed?, parentId?}, width?, height?}],
//!   edges: [{id, source, target, type?}] }
//! ```
//!
//! Transient fields (`selected`, `hidden`, edge markers) are never written.
//! The version tag is carried through unchanged; there is no migration.

use serde::{Deserialize, Serialize};

use crate::errors::EditorError;
use crate::model::{
    DocumentMetadata, Edge, EdgeMarker, Node, NodeData, NodeStyle, Position, DEFAULT_BORDER_COLOR,
    DEFAULT_BORDER_WIDTH, DEFAULT_EDGE_TYPE, DEFAULT_NODE_COLOR, NODE_TYPE,
};

pub const SCHEMA_VERSION: u32 = 1;

/// Name used for exported files when the document name sanitizes to nothing
pub const FALLBACK_FILE_NAME: &str = "ConceptMap";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMap {
    pub id: String,
    pub version: u32,
    pub metadata: DocumentMetadata,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub id: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    pub position: Position,
    pub data: ExportNodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNodeData {
    pub label: String,
    #[serde(default)]
    pub style: ExportStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Node style as stored; older or hand-written files may omit fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
}

fn default_node_type() -> String {
    NODE_TYPE.to_string()
}

/// Graph and metadata rebuilt from an [`ExportMap`]
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedDocument {
    pub version: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub metadata: DocumentMetadata,
}

pub fn export_node(node: &Node) -> ExportNode {
    ExportNode {
        id: node.id.clone(),
        node_type: NODE_TYPE.to_string(),
        position: node.position,
        data: ExportNodeData {
            label: node.data.label.clone(),
            style: ExportStyle {
                bg_color: Some(node.data.style.bg_color.clone()),
                border_color: Some(node.data.style.border_color.clone()),
                border_width: Some(node.data.style.border_width),
                icon: node.data.style.icon.clone(),
            },
            collapsed: node.data.collapsed.then_some(true),
            parent_id: node.data.parent_id.clone(),
        },
        width: node.width,
        height: node.height,
    }
}

pub fn export_edge(edge: &Edge) -> ExportEdge {
    ExportEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        edge_type: Some(edge.edge_type.clone()),
    }
}

/// Build the persisted representation of a document, tagged with `version`
pub fn build_export_map(
    metadata: &DocumentMetadata,
    nodes: &[Node],
    edges: &[Edge],
    version: u32,
) -> ExportMap {
    ExportMap {
        id: metadata.id.clone(),
        version,
        metadata: metadata.clone(),
        nodes: nodes.iter().map(export_node).collect(),
        edges: edges.iter().map(export_edge).collect(),
    }
}

/// Rebuild the in-memory graph, filling in defaults for anything omitted
pub fn hydrate(document: &ExportMap) -> HydratedDocument {
    let nodes = document
        .nodes
        .iter()
        .map(|node| Node {
            id: node.id.clone(),
            position: node.position,
            width: node.width,
            height: node.height,
            selected: false,
            hidden: false,
            data: NodeData {
                label: node.data.label.clone(),
                style: NodeStyle {
                    bg_color: node
                        .data
                        .style
                        .bg_color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
                    border_color: node
                        .data
                        .style
                        .border_color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
                    border_width: node.data.style.border_width.unwrap_or(DEFAULT_BORDER_WIDTH),
                    icon: node.data.style.icon.clone(),
                },
                collapsed: node.data.collapsed.unwrap_or(false),
                parent_id: node.data.parent_id.clone(),
            },
        })
        .collect();

    let edges = document
        .edges
        .iter()
        .map(|edge| Edge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: edge
                .edge_type
                .clone()
                .unwrap_or_else(|| DEFAULT_EDGE_TYPE.to_string()),
            marker_end: EdgeMarker::default(),
            selected: false,
            hidden: false,
        })
        .collect();

    HydratedDocument {
        version: document.version,
        nodes,
        edges,
        metadata: document.metadata.clone(),
    }
}

impl ExportMap {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name for a JSON export of this document
    pub fn export_file_name(&self) -> String {
        format!("{}.json", safe_file_name(&self.metadata.name))
    }
}

/// Replace runs of characters that are unsafe in file names with `-`
pub fn safe_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for ch in name.chars() {
        if matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
