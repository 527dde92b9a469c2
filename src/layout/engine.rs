//! Diagram orchestration
//!
//! A build validates the input, lays out every node without an explicit
//! position, then routes and labels each connection in input order. The
//! result is a self-contained [`RenderModel`]: building the same input twice
//! produces the same model, and nothing in the input is modified.

use std::collections::{BTreeMap, HashMap};

use crate::diagram::{Connection, Diagram, Node};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::hierarchy;
use super::label::place_label;
use super::routing::Router;
use super::types::{ConnectionPath, LabelPlacement, PlacedNode, Point, RenderModel};
use super::validate_diagram;

/// Build the render model for a diagram using its own configuration
pub fn build(diagram: &Diagram) -> Result<RenderModel, LayoutError> {
    build_with(&diagram.nodes, &diagram.connections, &diagram.config)
}

/// Build the render model for a node and connection list
///
/// Fails only on configuration errors: an unusable config value, a
/// duplicate or malformed node, or a connection naming an unknown node or
/// looping back to its source. Routing problems never fail the build; a
/// connection without a grid path is drawn as a straight line and a label
/// that cannot keep its clearance is still placed.
pub fn build_with(
    nodes: &[Node],
    connections: &[Connection],
    config: &LayoutConfig,
) -> Result<RenderModel, LayoutError> {
    config.validate()?;
    validate_diagram(nodes, connections)?;
    tracing::debug!(
        nodes = nodes.len(),
        connections = connections.len(),
        "building diagram"
    );

    let placed = place_nodes(nodes, connections, config)?;
    let index: HashMap<&str, usize> = placed
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let router = Router::new(&placed, config);
    let mut connection_paths = Vec::with_capacity(connections.len());
    let mut label_placements = Vec::new();

    for (i, conn) in connections.iter().enumerate() {
        // validate_diagram has resolved every endpoint to a placed node
        let from = &placed[index[conn.from.as_str()]];
        let to = &placed[index[conn.to.as_str()]];
        let routed = router.route(from, to, conn);
        tracing::debug!(
            connection = i,
            from = %conn.from,
            to = %conn.to,
            waypoints = routed.waypoints.len(),
            fallback = routed.fallback,
            "routed connection"
        );

        let min_distance = conn
            .label_min_distance_from_ends
            .unwrap_or(config.min_spacing);
        if let Some(label) = place_label(&routed.waypoints, conn.label.as_deref(), min_distance) {
            if !label.clearance_met {
                tracing::debug!(
                    connection = i,
                    min_distance,
                    "label placed without the requested clearance"
                );
            }
            label_placements.push(LabelPlacement {
                connection_index: i,
                position: label.position,
                text: conn.label.clone().unwrap_or_default(),
                clearance_met: label.clearance_met,
            });
        }

        connection_paths.push(ConnectionPath {
            from: conn.from.clone(),
            to: conn.to.clone(),
            waypoints: routed.waypoints,
            from_side: routed.start.side,
            to_side: routed.end.side,
            fallback: routed.fallback,
        });
    }

    let node_positions: BTreeMap<String, Point> = placed
        .iter()
        .map(|node| (node.id.clone(), Point::new(node.bounds.x, node.bounds.y)))
        .collect();

    Ok(RenderModel {
        node_positions,
        connection_paths,
        label_placements,
    })
}

/// Merge explicit positions with auto-layout into the final node rectangles
fn place_nodes(
    nodes: &[Node],
    connections: &[Connection],
    config: &LayoutConfig,
) -> Result<Vec<PlacedNode>, LayoutError> {
    let auto = if nodes.iter().any(|n| n.position.is_none()) {
        hierarchy::layout(nodes, connections, config)
    } else {
        HashMap::new()
    };

    nodes
        .iter()
        .map(|node| {
            let origin = node
                .position
                .or_else(|| auto.get(&node.id).copied())
                .ok_or_else(|| LayoutError::invalid_node(&node.id, "no position assigned"))?;
            Ok(PlacedNode::new(node.id.clone(), node.geometry(), origin))
        })
        .collect()
}
