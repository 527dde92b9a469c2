//! Connector attachment points on node boundaries

use serde::Serialize;

use crate::diagram::{AnchorName, NodeGeometry};

use super::types::{BoundingBox, PlacedNode, Point};

/// Side of a node a connector attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Unit vector pointing away from the node
    pub fn outward(self) -> (f64, f64) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Right => (1.0, 0.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
        }
    }

    /// Whether a connector leaves this side horizontally
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// A concrete anchor: where the connector touches the node, and which way it leaves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAnchor {
    pub side: Side,
    pub point: Point,
}

impl ResolvedAnchor {
    pub fn outward(&self) -> (f64, f64) {
        self.side.outward()
    }
}

/// Get the attachment point on a bounding box side
pub fn attachment_point(bounds: &BoundingBox, side: Side) -> Point {
    match side {
        Side::Top => Point::new(bounds.x + bounds.width / 2.0, bounds.y),
        Side::Bottom => Point::new(bounds.x + bounds.width / 2.0, bounds.bottom()),
        Side::Left => Point::new(bounds.x, bounds.y + bounds.height / 2.0),
        Side::Right => Point::new(bounds.right(), bounds.y + bounds.height / 2.0),
    }
}

/// Pick the side of `from` facing `toward`
///
/// The dominant axis of the center-to-center delta wins; a tie between the
/// axes goes horizontal, and coincident centers resolve to `Right`.
pub fn facing_side(from: Point, toward: Point) -> Side {
    let dx = toward.x - from.x;
    let dy = toward.y - from.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    } else if dy > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// Resolve a named anchor on `node`, using `other_center` for `auto`
pub fn resolve_anchor(node: &PlacedNode, anchor: AnchorName, other_center: Point) -> ResolvedAnchor {
    let side = match anchor {
        AnchorName::Top => Side::Top,
        AnchorName::Right => Side::Right,
        AnchorName::Bottom => Side::Bottom,
        AnchorName::Left => Side::Left,
        AnchorName::Auto => facing_side(node.center(), other_center),
    };
    let point = match node.shape {
        NodeGeometry::Rect { .. } => attachment_point(&node.bounds, side),
    };
    ResolvedAnchor { side, point }
}
