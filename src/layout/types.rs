//! Core types for the layout engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagram::NodeGeometry;

use super::anchor::Side;

/// A 2D point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A bounding box representing the spatial extent of a node
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this bounding box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if this bounding box intersects another
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Grow the box by `margin` on every side
    pub fn inflate(&self, margin: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// A node whose final position is known: the flat, already-resolved snapshot
/// the router works from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub shape: NodeGeometry,
    pub bounds: BoundingBox,
}

impl PlacedNode {
    pub fn new(id: impl Into<String>, shape: NodeGeometry, origin: Point) -> Self {
        let bounds = match shape {
            NodeGeometry::Rect { width, height } => {
                BoundingBox::new(origin.x, origin.y, width, height)
            }
        };
        Self {
            id: id.into(),
            shape,
            bounds,
        }
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

/// Routed polyline for one connection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPath {
    pub from: String,
    pub to: String,
    /// Axis-aligned waypoints from the source anchor to the target anchor
    pub waypoints: Vec<Point>,
    pub from_side: Side,
    pub to_side: Side,
    /// True when no grid path existed and the anchors were joined directly
    pub fallback: bool,
}

/// Where a connection label is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    /// Index of the connection in the input order
    pub connection_index: usize,
    pub position: Point,
    pub text: String,
    /// False when the path was too short to honor the requested clearance
    pub clearance_met: bool,
}

/// The complete, immutable output of a diagram build
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    /// Top-left corner of every node
    pub node_positions: BTreeMap<String, Point>,
    pub connection_paths: Vec<ConnectionPath>,
    pub label_placements: Vec<LabelPlacement>,
}

impl RenderModel {
    /// Final top-left position of a node
    pub fn node_position(&self, id: &str) -> Option<Point> {
        self.node_positions.get(id).copied()
    }

    /// Label placement belonging to a connection, if it has one
    pub fn label_for(&self, connection_index: usize) -> Option<&LabelPlacement> {
        self.label_placements
            .iter()
            .find(|l| l.connection_index == connection_index)
    }
}
