//! Layout engine for flowchart diagrams
//!
//! This module takes a node and connection list, computes positions for the
//! nodes that lack one and routes every connection around the others,
//! producing a [`RenderModel`] for a renderer to draw.

pub mod anchor;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hierarchy;
pub mod label;
pub mod pathfinder;
pub mod routing;
pub mod simplify;
pub mod types;

pub use anchor::{resolve_anchor, ResolvedAnchor, Side};
pub use config::{LayoutConfig, LayoutDirection};
pub use engine::{build, build_with};
pub use error::LayoutError;
pub use grid::{build_grid, GridCell, OccupancyGrid};
pub use hierarchy::{assign_layers, LayerAssignment};
pub use label::place_label;
pub use pathfinder::find_path;
pub use routing::{RoutedConnection, Router};
pub use simplify::simplify_path;
pub use types::*;

use std::collections::HashSet;

use crate::diagram::{Connection, Node};

/// Check node ids, node geometry and connection endpoints before layout
///
/// Errors are reported for the first offending node or connection in input
/// order.
pub fn validate_diagram(nodes: &[Node], connections: &[Connection]) -> Result<(), LayoutError> {
    let mut defined = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !defined.insert(node.id.clone()) {
            return Err(LayoutError::duplicate(&node.id));
        }
        validate_node(node)?;
    }

    for (i, conn) in connections.iter().enumerate() {
        for name in [&conn.from, &conn.to] {
            if !defined.contains(name) {
                return Err(LayoutError::undefined(
                    name,
                    i,
                    find_similar(&defined, name, 2),
                ));
            }
        }
        if conn.from == conn.to {
            return Err(LayoutError::self_loop(&conn.from, i));
        }
        if let Some(distance) = conn.label_min_distance_from_ends {
            if !distance.is_finite() || distance < 0.0 {
                return Err(LayoutError::invalid_config(
                    format!("connections[{i}].labelMinDistanceFromEnds"),
                    "must be a non-negative number",
                ));
            }
        }
    }
    Ok(())
}

fn validate_node(node: &Node) -> Result<(), LayoutError> {
    for (field, value) in [("width", node.width), ("height", node.height)] {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::invalid_node(
                &node.id,
                format!("{field} must be a non-negative number, got {value}"),
            ));
        }
    }
    if let Some(position) = node.position {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(LayoutError::invalid_node(&node.id, "position must be finite"));
        }
    }
    Ok(())
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Single rolling row over the edit matrix
    let mut row: Vec<usize> = (0..=n).collect();
    for i in 1..=m {
        let mut diagonal = row[0];
        row[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            let next = (row[j] + 1).min(row[j - 1] + 1).min(diagonal + cost);
            diagonal = row[j];
            row[j] = next;
        }
    }
    row[n]
}

/// Defined node ids within `max_distance` edits of `target`, closest first
fn find_similar(defined: &HashSet<String>, target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &String)> = defined
        .iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist > 0 && dist <= max_distance).then_some((dist, name))
        })
        .collect();

    // Equal distances fall back to name order
    candidates.sort();
    candidates
        .into_iter()
        .map(|(_, name)| name.clone())
        .take(3)
        .collect()
}
