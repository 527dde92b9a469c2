//! Connection label placement

use super::types::Point;

/// A label position chosen along a polyline
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub position: Point,
    /// Index of the segment the label sits on
    pub segment: usize,
    /// False when no segment kept the requested distance from both path ends
    pub clearance_met: bool,
}

/// Find where to draw `label` on `waypoints`
///
/// A segment qualifies when both of its ends are at least
/// `min_distance_from_ends` away from the path extremities, measured along
/// the path. The longest qualifying segment wins (earliest on ties) and the
/// label goes at its midpoint. If none qualifies, the longest segment overall
/// is used and the placement is marked as not meeting the clearance.
///
/// Returns `None` for a missing or empty label, or a path with fewer than two
/// points.
pub fn place_label(
    waypoints: &[Point],
    label: Option<&str>,
    min_distance_from_ends: f64,
) -> Option<PlacedLabel> {
    if label.map_or(true, str::is_empty) || waypoints.len() < 2 {
        return None;
    }

    let lengths: Vec<f64> = waypoints
        .windows(2)
        .map(|w| w[0].distance_to(w[1]))
        .collect();
    let total: f64 = lengths.iter().sum();

    let mut clear: Option<usize> = None;
    let mut longest = 0;
    let mut offset = 0.0;
    for (i, &len) in lengths.iter().enumerate() {
        let start = offset;
        let end = offset + len;
        offset = end;

        if len > lengths[longest] {
            longest = i;
        }
        let fits = start >= min_distance_from_ends && total - end >= min_distance_from_ends;
        if fits && clear.map_or(true, |best| len > lengths[best]) {
            clear = Some(i);
        }
    }

    let (segment, clearance_met) = match clear {
        Some(i) => (i, true),
        None => (longest, false),
    };
    Some(PlacedLabel {
        position: waypoints[segment].midpoint(waypoints[segment + 1]),
        segment,
        clearance_met,
    })
}
