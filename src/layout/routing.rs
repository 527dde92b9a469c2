//! Connection routing between nodes
//!
//! Each connection is routed independently: anchors are resolved on both
//! endpoint nodes, an obstacle grid is built from every other node, A* finds
//! a cell path and the path is reduced to an orthogonal polyline. When no
//! grid path exists the anchors are joined by a straight segment.
//!
//! The grids cover `canvasBounds` when it is configured. Otherwise they cover
//! the padded nodes plus a free border of [`CANVAS_BORDER_CELLS`] cells.

use crate::diagram::Connection;

use super::anchor::{resolve_anchor, ResolvedAnchor, Side};
use super::config::LayoutConfig;
use super::grid::{build_grid, routing_canvas, GridCell, Heading, OccupancyGrid};
use super::pathfinder::find_path_directed;
use super::simplify::simplify_path;
use super::types::{BoundingBox, PlacedNode, Point};

/// Width of the free border around the padded nodes, in grid cells
pub const CANVAS_BORDER_CELLS: f64 = 2.0;

/// Result of routing a single connection
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedConnection {
    pub start: ResolvedAnchor,
    pub end: ResolvedAnchor,
    pub waypoints: Vec<Point>,
    /// True when the anchors were joined directly instead of through the grid
    pub fallback: bool,
}

/// Routes connections over a fixed snapshot of placed nodes
#[derive(Debug)]
pub struct Router<'a> {
    nodes: &'a [PlacedNode],
    config: &'a LayoutConfig,
    canvas: BoundingBox,
}

impl<'a> Router<'a> {
    pub fn new(nodes: &'a [PlacedNode], config: &'a LayoutConfig) -> Self {
        let canvas = config.canvas_bounds.unwrap_or_else(|| {
            routing_canvas(
                nodes,
                config.node_padding,
                config.grid_size * CANVAS_BORDER_CELLS,
            )
        });
        Self {
            nodes,
            config,
            canvas,
        }
    }

    /// Canvas the obstacle grids cover
    pub fn canvas(&self) -> BoundingBox {
        self.canvas
    }

    /// Build the obstacle grid for a connection between two nodes
    ///
    /// Returns `None` when the grid would exceed `max_grid_cells`.
    pub fn obstacle_grid(&self, from: &PlacedNode, to: &PlacedNode) -> Option<OccupancyGrid> {
        let (cols, rows) = OccupancyGrid::dimensions(&self.canvas, self.config.grid_size);
        let cells = cols.saturating_mul(rows);
        if cells > self.config.max_grid_cells {
            tracing::warn!(
                from = %from.id,
                to = %to.id,
                cells,
                max = self.config.max_grid_cells,
                "routing grid too large, connecting directly"
            );
            return None;
        }
        Some(build_grid(
            self.nodes,
            &[from.id.as_str(), to.id.as_str()],
            self.config.grid_size,
            self.config.node_padding,
            self.canvas,
        ))
    }

    /// Route `conn` between the nodes at `from` and `to`
    pub fn route(&self, from: &PlacedNode, to: &PlacedNode, conn: &Connection) -> RoutedConnection {
        let start = resolve_anchor(from, conn.from_anchor, to.center());
        let end = resolve_anchor(to, conn.to_anchor, from.center());

        let path = self.obstacle_grid(from, to).and_then(|grid| {
            let cells = find_path_directed(
                &grid,
                search_cell(&grid, &start),
                search_cell(&grid, &end),
                Some(heading(start.side)),
                Some(heading(end.side.opposite())),
            )?;
            Some(simplify_path(&grid, &cells, &start, &end))
        });

        match path {
            Some(waypoints) => RoutedConnection {
                start,
                end,
                waypoints,
                fallback: false,
            },
            None => RoutedConnection {
                start,
                end,
                waypoints: vec![start.point, end.point],
                fallback: true,
            },
        }
    }
}

/// Cell the search leaves from or arrives at for `anchor`
///
/// This is the anchor's own cell when its center lies strictly outside the
/// node, otherwise the next cell outwards. Elbows are placed on end cell
/// centers, so they never fall behind the anchor line.
fn search_cell(grid: &OccupancyGrid, anchor: &ResolvedAnchor) -> GridCell {
    let cell = grid.cell_at(anchor.point);
    let center = grid.cell_center(cell);
    let (dx, dy) = anchor.outward();
    let ahead = (center.x - anchor.point.x) * dx + (center.y - anchor.point.y) * dy;
    if ahead > 0.0 {
        return cell;
    }
    grid.step(cell, heading(anchor.side)).unwrap_or(cell)
}

fn heading(side: Side) -> Heading {
    match side {
        Side::Top => Heading::Up,
        Side::Right => Heading::Right,
        Side::Bottom => Heading::Down,
        Side::Left => Heading::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{AnchorName, NodeGeometry};

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> PlacedNode {
        PlacedNode::new(
            id,
            NodeGeometry::Rect {
                width: w,
                height: h,
            },
            Point::new(x, y),
        )
    }

    fn is_orthogonal(points: &[Point]) -> bool {
        points
            .windows(2)
            .all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
    }

    fn segment_box(a: Point, b: Point) -> BoundingBox {
        BoundingBox::new(a.x.min(b.x), a.y.min(b.y), (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[test]
    fn test_route_horizontal_neighbors() {
        let nodes = vec![rect("a", 0.0, 0.0, 50.0, 50.0), rect("b", 200.0, 0.0, 50.0, 50.0)];
        let config = LayoutConfig::default();
        let router = Router::new(&nodes, &config);
        let routed = router.route(&nodes[0], &nodes[1], &Connection::new("a", "b"));

        assert!(!routed.fallback);
        assert_eq!(routed.start.side, Side::Right);
        assert_eq!(routed.end.side, Side::Left);
        assert_eq!(
            routed.waypoints,
            vec![Point::new(50.0, 25.0), Point::new(200.0, 25.0)]
        );
    }

    #[test]
    fn test_route_around_obstacle() {
        let nodes = vec![
            rect("a", 0.0, 100.0, 50.0, 50.0),
            rect("b", 300.0, 100.0, 50.0, 50.0),
            rect("wall", 150.0, 75.0, 50.0, 100.0),
        ];
        let config = LayoutConfig::default();
        let router = Router::new(&nodes, &config);
        let routed = router.route(&nodes[0], &nodes[1], &Connection::new("a", "b"));

        assert!(!routed.fallback);
        assert!(routed.waypoints.len() > 2);
        assert!(is_orthogonal(&routed.waypoints));
        assert_eq!(routed.waypoints.first(), Some(&Point::new(50.0, 125.0)));
        assert_eq!(routed.waypoints.last(), Some(&Point::new(300.0, 125.0)));

        let wall = nodes[2].bounds.inflate(config.node_padding);
        for w in routed.waypoints.windows(2) {
            assert!(!segment_box(w[0], w[1]).intersects(&wall), "segment {:?} crosses the wall", w);
        }
    }

    #[test]
    fn test_route_falls_back_when_blocked() {
        let nodes = vec![
            rect("a", 0.0, 100.0, 50.0, 50.0),
            rect("b", 300.0, 100.0, 50.0, 50.0),
            rect("wall", 150.0, 0.0, 50.0, 300.0),
        ];
        // Wall padding spans the whole canvas height
        let config =
            LayoutConfig::default().with_canvas_bounds(BoundingBox::new(-25.0, -25.0, 400.0, 350.0));
        let router = Router::new(&nodes, &config);
        let routed = router.route(&nodes[0], &nodes[1], &Connection::new("a", "b"));

        assert!(routed.fallback);
        assert_eq!(
            routed.waypoints,
            vec![Point::new(50.0, 125.0), Point::new(300.0, 125.0)]
        );
    }

    #[test]
    fn test_route_falls_back_when_grid_too_large() {
        let nodes = vec![rect("a", 0.0, 0.0, 50.0, 50.0), rect("b", 0.0, 200.0, 50.0, 50.0)];
        let config = LayoutConfig::default().with_max_grid_cells(10);
        let router = Router::new(&nodes, &config);
        assert!(router.obstacle_grid(&nodes[0], &nodes[1]).is_none());

        let routed = router.route(&nodes[0], &nodes[1], &Connection::new("a", "b"));
        assert!(routed.fallback);
        assert_eq!(
            routed.waypoints,
            vec![Point::new(25.0, 50.0), Point::new(25.0, 200.0)]
        );
    }

    #[test]
    fn test_route_respects_named_anchors() {
        let nodes = vec![rect("a", 0.0, 0.0, 60.0, 40.0), rect("b", 200.0, 200.0, 60.0, 40.0)];
        let config = LayoutConfig::default();
        let router = Router::new(&nodes, &config);
        let conn = Connection::new("a", "b").with_anchors(AnchorName::Bottom, AnchorName::Left);
        let routed = router.route(&nodes[0], &nodes[1], &conn);

        assert!(!routed.fallback);
        assert!(is_orthogonal(&routed.waypoints));
        assert_eq!(routed.waypoints.first(), Some(&Point::new(30.0, 40.0)));
        assert_eq!(routed.waypoints.last(), Some(&Point::new(200.0, 220.0)));
        // Leaves downwards, arrives horizontally
        assert_eq!(routed.waypoints[1].x, 30.0);
        let n = routed.waypoints.len();
        assert_eq!(routed.waypoints[n - 2].y, 220.0);
    }

    #[test]
    fn test_route_passes_wall_through_canvas_border() {
        let nodes = vec![
            rect("a", 0.0, 100.0, 50.0, 50.0),
            rect("b", 300.0, 100.0, 50.0, 50.0),
            rect("wall", 150.0, 0.0, 50.0, 300.0),
        ];
        let config = LayoutConfig::default();
        let router = Router::new(&nodes, &config);
        assert_eq!(router.canvas(), BoundingBox::new(-45.0, -45.0, 440.0, 390.0));

        let routed = router.route(&nodes[0], &nodes[1], &Connection::new("a", "b"));
        assert!(!routed.fallback);
        assert!(is_orthogonal(&routed.waypoints));
        let wall = nodes[2].bounds.inflate(config.node_padding);
        for w in routed.waypoints.windows(2) {
            assert!(!segment_box(w[0], w[1]).intersects(&wall), "segment {:?} crosses the wall", w);
        }
    }

    #[test]
    fn test_route_elbows_stay_outside_off_grid_nodes() {
        // Right edges at x = 123 fall between cell centers
        let nodes = vec![rect("a", 0.0, 0.0, 123.0, 40.0), rect("b", 0.0, 200.0, 123.0, 40.0)];
        let config = LayoutConfig::default();
        let router = Router::new(&nodes, &config);
        let conn = Connection::new("a", "b").with_anchors(AnchorName::Right, AnchorName::Right);
        let routed = router.route(&nodes[0], &nodes[1], &conn);

        assert!(!routed.fallback);
        assert_eq!(
            routed.waypoints,
            vec![
                Point::new(123.0, 20.0),
                Point::new(130.0, 20.0),
                Point::new(130.0, 220.0),
                Point::new(123.0, 220.0),
            ]
        );
        assert!(routed.waypoints.iter().all(|p| p.x >= 123.0));
    }

    #[test]
    fn test_search_cell_steps_out_of_node() {
        let nodes = vec![rect("a", 0.0, 0.0, 123.0, 40.0), rect("b", 0.0, 200.0, 117.0, 40.0)];
        let config = LayoutConfig::default();
        let router = Router::new(&nodes, &config);
        let grid = router.obstacle_grid(&nodes[0], &nodes[1]).unwrap();

        // Center x = 120 is behind the anchor at 123: step right
        let behind = resolve_anchor(&nodes[0], AnchorName::Right, nodes[1].center());
        assert_eq!(grid.cell_center(search_cell(&grid, &behind)).x, 130.0);

        // Center x = 120 is already outside the anchor at 117
        let ahead = resolve_anchor(&nodes[1], AnchorName::Right, nodes[0].center());
        assert_eq!(grid.cell_center(search_cell(&grid, &ahead)).x, 120.0);
    }
}
