//! Reduction of grid cell paths to orthogonal polylines

use super::anchor::ResolvedAnchor;
use super::grid::{GridCell, OccupancyGrid};
use super::types::Point;

const EPSILON: f64 = 1e-6;

/// Convert a cell path into canvas-space waypoints
///
/// The cell centers are reduced to their corners, then the first and last
/// straight runs are shifted onto the anchor lines (a run never leaves its
/// row or column doing so, since each anchor lies in the row or column of its
/// end cell along the anchor's outward axis). The
/// first and last corners are replaced by the exact anchor points; where an
/// anchor is not axis-aligned with its neighbouring corner an elbow is
/// inserted along the anchor's outward axis, so every segment stays
/// horizontal or vertical.
pub fn simplify_path(
    grid: &OccupancyGrid,
    cells: &[GridCell],
    start: &ResolvedAnchor,
    end: &ResolvedAnchor,
) -> Vec<Point> {
    if cells.len() < 2 {
        let mut points = vec![start.point];
        if !aligned(start.point, end.point) {
            points.extend(direct_elbows(start, end));
        }
        points.push(end.point);
        return collapse_collinear(&points);
    }

    let centers: Vec<Point> = cells.iter().map(|c| grid.cell_center(*c)).collect();
    let mut corners = collapse_collinear(&centers);
    if corners.len() == 2 && snaps_conflict(corners[0], corners[1], start, end) {
        // One straight run cannot sit on both anchor lines; split it
        let mid = corners[0].midpoint(corners[1]);
        corners = vec![corners[0], mid, mid, corners[1]];
    }
    let n = corners.len();
    snap_run(&mut corners, 0, start);
    snap_run(&mut corners, n - 2, end);

    let mut points = Vec::with_capacity(n + 2);
    points.push(start.point);
    if !aligned(start.point, corners[1]) {
        points.push(leave_along(start.point, corners[1], start));
    }
    points.extend_from_slice(&corners[1..n - 1]);
    let prev = points[points.len() - 1];
    if !aligned(prev, end.point) {
        points.push(arrive_along(prev, end.point, end));
    }
    points.push(end.point);

    collapse_collinear(&points)
}

/// Remove coincident points and every interior point where the path does
/// not change direction
///
/// The result keeps the first and last point, and applying it again returns
/// the same list.
pub fn collapse_collinear(points: &[Point]) -> Vec<Point> {
    let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if deduped.last().map_or(true, |last| !coincident(*last, p)) {
            deduped.push(p);
        }
    }
    if deduped.len() < 2 {
        // Every point coincides; keep the degenerate two-point path
        return match (points.first(), points.last()) {
            (Some(first), Some(last)) => vec![*first, *last],
            _ => Vec::new(),
        };
    }

    let mut out = Vec::with_capacity(deduped.len());
    out.push(deduped[0]);
    for i in 1..deduped.len() - 1 {
        let prev = out[out.len() - 1];
        let curr = deduped[i];
        let next = deduped[i + 1];
        if !same_direction(direction(prev, curr), direction(curr, next)) {
            out.push(curr);
        }
    }
    out.push(deduped[deduped.len() - 1]);
    out
}

fn is_horizontal_run(a: Point, b: Point) -> bool {
    (a.y - b.y).abs() < EPSILON
}

/// Move the run `corners[i]..corners[i + 1]` onto the anchor's line when the
/// run is parallel to the anchor's outward axis
fn snap_run(corners: &mut [Point], i: usize, anchor: &ResolvedAnchor) {
    let horizontal = is_horizontal_run(corners[i], corners[i + 1]);
    if horizontal != anchor.side.is_horizontal() {
        return;
    }
    for p in &mut corners[i..=i + 1] {
        if horizontal {
            p.y = anchor.point.y;
        } else {
            p.x = anchor.point.x;
        }
    }
}

fn snaps_conflict(a: Point, b: Point, start: &ResolvedAnchor, end: &ResolvedAnchor) -> bool {
    let horizontal = is_horizontal_run(a, b);
    if start.side.is_horizontal() != horizontal || end.side.is_horizontal() != horizontal {
        return false;
    }
    if horizontal {
        (start.point.y - end.point.y).abs() >= EPSILON
    } else {
        (start.point.x - end.point.x).abs() >= EPSILON
    }
}

fn leave_along(from: Point, to: Point, anchor: &ResolvedAnchor) -> Point {
    if anchor.side.is_horizontal() {
        Point::new(to.x, from.y)
    } else {
        Point::new(from.x, to.y)
    }
}

fn arrive_along(from: Point, to: Point, anchor: &ResolvedAnchor) -> Point {
    if anchor.side.is_horizontal() {
        Point::new(from.x, to.y)
    } else {
        Point::new(to.x, from.y)
    }
}

/// Elbows joining two anchors that share a single cell
fn direct_elbows(start: &ResolvedAnchor, end: &ResolvedAnchor) -> Vec<Point> {
    let (a, b) = (start.point, end.point);
    match (start.side.is_horizontal(), end.side.is_horizontal()) {
        (true, true) => {
            let mid_x = (a.x + b.x) / 2.0;
            vec![Point::new(mid_x, a.y), Point::new(mid_x, b.y)]
        }
        (false, false) => {
            let mid_y = (a.y + b.y) / 2.0;
            vec![Point::new(a.x, mid_y), Point::new(b.x, mid_y)]
        }
        _ => vec![leave_along(a, b, start)],
    }
}

fn aligned(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON || (a.y - b.y).abs() < EPSILON
}

fn coincident(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn direction(a: Point, b: Point) -> (f64, f64) {
    let len = a.distance_to(b);
    ((b.x - a.x) / len, (b.y - a.y) / len)
}

fn same_direction(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < EPSILON && (a.1 - b.1).abs() < EPSILON
}
