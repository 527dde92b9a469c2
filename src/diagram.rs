//! Diagram description consumed by the layout engine
//!
//! A diagram is plain serde data: a list of nodes, a list of directed
//! connections, and the layout configuration. It can be built in code or
//! loaded from TOML:
//!
//! ```toml
//! [[nodes]]
//! id = "start"
//! text = "Start"
//! width = 120
//! height = 40
//!
//! [[nodes]]
//! id = "end"
//! text = "End"
//! width = 120
//! height = 40
//! position = { x = 300, y = 0 }
//!
//! [[connections]]
//! from = "start"
//! to = "end"
//! label = "done"
//!
//! [config]
//! layoutDirection = "horizontal"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::layout::{LayoutConfig, Point};

/// Shape of a node, as far as routing is concerned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeGeometry {
    Rect { width: f64, height: f64 },
}

/// A named box in the diagram
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub width: f64,
    pub height: f64,
    /// Top-left corner; `None` means the node is placed by auto-layout
    #[serde(default)]
    pub position: Option<Point>,
    /// Style token, carried through untouched
    #[serde(default)]
    pub tint: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        let id = id.into();
        Self {
            text: id.clone(),
            id,
            width,
            height,
            position: None,
            tint: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    pub fn with_tint(mut self, tint: impl Into<String>) -> Self {
        self.tint = Some(tint.into());
        self
    }

    pub fn geometry(&self) -> NodeGeometry {
        NodeGeometry::Rect {
            width: self.width,
            height: self.height,
        }
    }
}

/// Requested attachment point of a connection on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorName {
    Top,
    Right,
    Bottom,
    Left,
    #[default]
    Auto,
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub from_anchor: AnchorName,
    #[serde(default)]
    pub to_anchor: AnchorName,
    #[serde(default)]
    pub label: Option<String>,
    /// Overrides `LayoutConfig::min_spacing` for this connection's label
    #[serde(default)]
    pub label_min_distance_from_ends: Option<f64>,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            from_anchor: AnchorName::Auto,
            to_anchor: AnchorName::Auto,
            label: None,
            label_min_distance_from_ends: None,
        }
    }

    pub fn with_anchors(mut self, from: AnchorName, to: AnchorName) -> Self {
        self.from_anchor = from;
        self.to_anchor = to;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_label_clearance(mut self, distance: f64) -> Self {
        self.label_min_distance_from_ends = Some(distance);
        self
    }
}

/// A complete diagram: nodes, connections and layout settings
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub config: LayoutConfig,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Load a diagram from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a diagram from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }
}
