//! Occupancy grid used by the connection router
//!
//! The canvas is rasterized into square cells; a cell is blocked when its
//! center falls inside an obstacle node's padded rectangle. A fresh grid is
//! built for every connection because the obstacle set (all nodes except the
//! connection's own endpoints) differs per connection.

use crate::diagram::NodeGeometry;

use super::types::{BoundingBox, PlacedNode, Point};

/// A cell coordinate in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Manhattan distance in cells
    pub fn manhattan(&self, other: GridCell) -> usize {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

/// 2D boolean lattice of blocked cells over the canvas
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    origin: Point,
    cell_size: f64,
    cols: usize,
    rows: usize,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an empty grid covering `canvas`
    pub fn new(canvas: BoundingBox, cell_size: f64) -> Self {
        let (cols, rows) = Self::dimensions(&canvas, cell_size);
        Self {
            origin: Point::new(canvas.x, canvas.y),
            cell_size,
            cols,
            rows,
            blocked: vec![false; cols * rows],
        }
    }

    /// Column and row count a grid over `canvas` would have
    pub fn dimensions(canvas: &BoundingBox, cell_size: f64) -> (usize, usize) {
        let cols = (canvas.width / cell_size).ceil().max(1.0) as usize;
        let rows = (canvas.height / cell_size).ceil().max(1.0) as usize;
        (cols, rows)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub(crate) fn index(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn is_blocked(&self, cell: GridCell) -> bool {
        self.blocked[self.index(cell)]
    }

    /// Canvas-space center of a cell
    pub fn cell_center(&self, cell: GridCell) -> Point {
        Point::new(
            self.origin.x + (cell.col as f64 + 0.5) * self.cell_size,
            self.origin.y + (cell.row as f64 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing `point`, clamped to the grid
    pub fn cell_at(&self, point: Point) -> GridCell {
        let col = ((point.x - self.origin.x) / self.cell_size).floor();
        let row = ((point.y - self.origin.y) / self.cell_size).floor();
        GridCell::new(
            clamp_index(col, self.cols),
            clamp_index(row, self.rows),
        )
    }

    /// Mark every cell whose center lies inside `rect` as blocked
    pub fn block_rect(&mut self, rect: &BoundingBox) {
        let Some((col_start, col_end)) =
            covered_range(rect.x, rect.right(), self.origin.x, self.cell_size, self.cols)
        else {
            return;
        };
        let Some((row_start, row_end)) =
            covered_range(rect.y, rect.bottom(), self.origin.y, self.cell_size, self.rows)
        else {
            return;
        };
        for row in row_start..=row_end {
            for col in col_start..=col_end {
                let idx = self.index(GridCell::new(col, row));
                self.blocked[idx] = true;
            }
        }
    }

    /// The cell one step from `cell` along `heading`, if it is inside the grid
    pub fn step(&self, cell: GridCell, heading: Heading) -> Option<GridCell> {
        let (dc, dr) = heading.delta();
        let col = cell.col.checked_add_signed(dc)?;
        let row = cell.row.checked_add_signed(dr)?;
        (col < self.cols && row < self.rows).then(|| GridCell::new(col, row))
    }

    /// The 4-connected neighbours of a cell that lie inside the grid
    pub fn neighbors(&self, cell: GridCell) -> impl Iterator<Item = (Heading, GridCell)> + '_ {
        Heading::ALL
            .into_iter()
            .filter_map(move |heading| Some((heading, self.step(cell, heading)?)))
    }

    /// Cells crossed by an axis-aligned segment, in order from `a` to `b`
    ///
    /// Diagonal segments are rasterized as their horizontal leg followed by
    /// their vertical leg.
    pub fn cells_on_segment(&self, a: Point, b: Point) -> Vec<GridCell> {
        let from = self.cell_at(a);
        let to = self.cell_at(b);
        let mut cells = vec![from];
        let mut current = from;
        while current.col != to.col {
            current.col = if to.col > current.col {
                current.col + 1
            } else {
                current.col - 1
            };
            cells.push(current);
        }
        while current.row != to.row {
            current.row = if to.row > current.row {
                current.row + 1
            } else {
                current.row - 1
            };
            cells.push(current);
        }
        cells
    }
}

/// Direction of a single grid step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Heading::Up => 0,
            Heading::Down => 1,
            Heading::Left => 2,
            Heading::Right => 3,
        }
    }
}

fn clamp_index(value: f64, len: usize) -> usize {
    if value <= 0.0 {
        0
    } else {
        (value as usize).min(len - 1)
    }
}

/// Inclusive index range of cells whose centers fall within `[lo, hi]`
fn covered_range(lo: f64, hi: f64, origin: f64, cell: f64, len: usize) -> Option<(usize, usize)> {
    let first = ((lo - origin) / cell - 0.5).ceil().max(0.0);
    let last = ((hi - origin) / cell - 0.5).floor();
    if last < 0.0 || first > last || first >= len as f64 {
        return None;
    }
    Some((first as usize, (last as usize).min(len - 1)))
}

/// Canvas holding every node with its clearance, grown by a free `border`
///
/// The border leaves a corridor around the outermost obstacles, so a path
/// can always pass a node whose padding spans the full width of the nodes.
pub fn routing_canvas(nodes: &[PlacedNode], node_padding: f64, border: f64) -> BoundingBox {
    nodes
        .iter()
        .map(|n| n.bounds.inflate(node_padding))
        .reduce(|acc, b| acc.union(&b))
        .unwrap_or_default()
        .inflate(border)
}

/// Build the obstacle grid for one connection
///
/// Every node whose id is not in `exclude` is rasterized with its rectangle
/// grown by `node_padding` on each side.
pub fn build_grid(
    nodes: &[PlacedNode],
    exclude: &[&str],
    grid_size: f64,
    node_padding: f64,
    canvas: BoundingBox,
) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(canvas, grid_size);
    for node in nodes.iter().filter(|n| !exclude.contains(&n.id.as_str())) {
        let footprint = match node.shape {
            NodeGeometry::Rect { .. } => node.bounds.inflate(node_padding),
        };
        grid.block_rect(&footprint);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_dimensions_round_up() {
        let grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 95.0, 40.0), 10.0);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cell_count(), 40);
    }

    #[test]
    fn test_cell_center_and_lookup() {
        let grid = OccupancyGrid::new(BoundingBox::new(-20.0, -20.0, 100.0, 100.0), 10.0);
        let cell = grid.cell_at(Point::new(3.0, 17.0));
        assert_eq!(cell, GridCell::new(2, 3));
        assert_eq!(grid.cell_center(cell), Point::new(5.0, 15.0));
    }

    #[test]
    fn test_cell_at_clamps_outside_points() {
        let grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 50.0, 50.0), 10.0);
        assert_eq!(grid.cell_at(Point::new(-30.0, 500.0)), GridCell::new(0, 4));
    }

    #[test]
    fn test_block_rect_uses_cell_centers() {
        let mut grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0), 10.0);
        // Centers at 25 and 35 fall inside [22, 38]; 15 and 45 do not
        grid.block_rect(&BoundingBox::new(22.0, 22.0, 16.0, 16.0));
        assert!(grid.is_blocked(GridCell::new(2, 2)));
        assert!(grid.is_blocked(GridCell::new(3, 3)));
        assert!(!grid.is_blocked(GridCell::new(1, 2)));
        assert!(!grid.is_blocked(GridCell::new(4, 3)));
    }

    #[test]
    fn test_block_rect_outside_canvas_is_ignored() {
        let mut grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 50.0, 50.0), 10.0);
        grid.block_rect(&BoundingBox::new(200.0, 200.0, 10.0, 10.0));
        grid.block_rect(&BoundingBox::new(-40.0, -40.0, 10.0, 10.0));
        assert!((0..5).all(|c| (0..5).all(|r| !grid.is_blocked(GridCell::new(c, r)))));
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 30.0, 30.0), 10.0);
        let neighbors: Vec<_> = grid.neighbors(GridCell::new(0, 0)).map(|(_, c)| c).collect();
        assert_eq!(neighbors, vec![GridCell::new(0, 1), GridCell::new(1, 0)]);
    }

    #[test]
    fn test_build_grid_excludes_endpoints() {
        let nodes = vec![
            rect("a", 0.0, 0.0, 40.0, 40.0),
            rect("b", 200.0, 0.0, 40.0, 40.0),
            rect("c", 100.0, 0.0, 40.0, 40.0),
        ];
        let canvas = routing_canvas(&nodes, 10.0, 0.0);
        let grid = build_grid(&nodes, &["a", "b"], 10.0, 10.0, canvas);

        assert!(!grid.is_blocked(grid.cell_at(nodes[0].center())));
        assert!(!grid.is_blocked(grid.cell_at(nodes[1].center())));
        assert!(grid.is_blocked(grid.cell_at(nodes[2].center())));
        // Padding extends the obstacle beyond the node itself
        assert!(grid.is_blocked(grid.cell_at(Point::new(95.0, 20.0))));
    }

    #[test]
    fn test_routing_canvas_includes_padding() {
        let nodes = vec![rect("a", 0.0, 0.0, 40.0, 40.0), rect("b", 100.0, 60.0, 40.0, 40.0)];
        assert_eq!(
            routing_canvas(&nodes, 25.0, 0.0),
            BoundingBox::new(-25.0, -25.0, 190.0, 150.0)
        );
    }

    #[test]
    fn test_routing_canvas_border_frees_outer_cells() {
        let nodes = vec![
            rect("a", 0.0, 0.0, 120.0, 40.0),
            rect("b", 0.0, 140.0, 120.0, 40.0),
            rect("c", 0.0, 280.0, 120.0, 40.0),
        ];
        let canvas = routing_canvas(&nodes, 25.0, 20.0);
        assert_eq!(canvas, BoundingBox::new(-45.0, -45.0, 210.0, 410.0));

        // Beside the middle node the outer two columns on each side stay free
        let grid = build_grid(&nodes, &["a", "c"], 10.0, 25.0, canvas);
        let row = grid.cell_at(nodes[1].center()).row;
        let free: Vec<usize> = (0..grid.cols())
            .filter(|&col| !grid.is_blocked(GridCell::new(col, row)))
            .collect();
        assert_eq!(free, vec![0, 1, 19, 20]);
    }

    #[test]
    fn test_step_stays_inside_grid() {
        let grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 30.0, 30.0), 10.0);
        assert_eq!(grid.step(GridCell::new(1, 1), Heading::Right), Some(GridCell::new(2, 1)));
        assert_eq!(grid.step(GridCell::new(2, 1), Heading::Right), None);
        assert_eq!(grid.step(GridCell::new(0, 0), Heading::Up), None);
    }

    #[test]
    fn test_cells_on_segment_horizontal() {
        let grid = OccupancyGrid::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0), 10.0);
        let cells = grid.cells_on_segment(Point::new(35.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(
            cells,
            vec![
                GridCell::new(3, 0),
                GridCell::new(2, 0),
                GridCell::new(1, 0),
                GridCell::new(0, 0)
            ]
        );
    }
}
