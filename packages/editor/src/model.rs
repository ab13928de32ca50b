//! # Graph Model
//!
//! Nodes, edges and document metadata as the editor holds them in memory.
//!
//! `selected` and `hidden` are transient: `selected` mirrors the canvas
//! selection and `hidden` is only ever set on a collapse projection. Neither
//! is persisted.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NODE_TYPE: &str = "concept";
pub const DEFAULT_NODE_LABEL: &str = "Idea";
pub const DEFAULT_EDGE_TYPE: &str = "default";

pub const DEFAULT_NODE_COLOR: &str = "#fef3c7";
pub const DEFAULT_BORDER_COLOR: &str = "#1f2937";
pub const DEFAULT_BORDER_WIDTH: u32 = 2;

/// Layout hints used when a node has not been measured yet
pub const DEFAULT_NODE_WIDTH: f64 = 180.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 64.0;

/// Horizontal distance between a parent's right edge and its children
pub const CHILD_HORIZONTAL_GAP: f64 = 120.0;

/// Vertical distance between stacked siblings
pub const VERTICAL_GAP: f64 = 40.0;

/// Generate a fresh document/node/edge id
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current time as an ISO-8601 UTC timestamp (millisecond precision)
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub bg_color: String,
    pub border_color: String,
    pub border_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            bg_color: DEFAULT_NODE_COLOR.to_string(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            border_width: DEFAULT_BORDER_WIDTH,
            icon: None,
        }
    }
}

impl NodeStyle {
    /// Merge the fields present in `patch`, keeping the rest
    pub fn merge(&mut self, patch: &StylePatch) {
        if let Some(bg_color) = &patch.bg_color {
            self.bg_color = bg_color.clone();
        }
        if let Some(border_color) = &patch.border_color {
            self.border_color = border_color.clone();
        }
        if let Some(border_width) = patch.border_width {
            self.border_width = border_width;
        }
        if let Some(icon) = &patch.icon {
            self.icon = Some(icon.clone());
        }
    }
}

/// Partial style update (only `Some` fields are applied)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub border_width: Option<u32>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        self.bg_color.is_none()
            && self.border_color.is_none()
            && self.border_width.is_none()
            && self.icon.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub style: NodeStyle,
    #[serde(default)]
    pub collapsed: bool,
    /// Logical tree parent, set by the first connection into this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// A concept node on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hidden: bool,
    pub data: NodeData,
}

impl Node {
    /// Create a default-styled concept node with a fresh id
    pub fn concept(position: Position, parent_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            position,
            width: None,
            height: None,
            selected: false,
            hidden: false,
            data: NodeData {
                label: DEFAULT_NODE_LABEL.to_string(),
                style: NodeStyle::default(),
                collapsed: false,
                parent_id,
            },
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.data.parent_id.as_deref()
    }
}

/// Arrow head drawn at the end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    Arrow,
    #[default]
    ArrowClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: MarkerType,
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub marker_end: EdgeMarker,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Edge {
    /// Create a default edge with a closed arrow marker and a fresh id
    pub fn connect(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            source: source.into(),
            target: target.into(),
            edge_type: DEFAULT_EDGE_TYPE.to_string(),
            marker_end: EdgeMarker::default(),
            selected: false,
            hidden: false,
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Entry in the list of known documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&DocumentMetadata> for DocumentSummary {
    fn from(metadata: &DocumentMetadata) -> Self {
        Self {
            id: metadata.id.clone(),
            name: metadata.name.clone(),
            created_at: metadata.created_at.clone(),
            updated_at: metadata.updated_at.clone(),
        }
    }
}
