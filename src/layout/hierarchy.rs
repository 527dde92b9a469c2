//! Hierarchical auto-layout for nodes without an explicit position
//!
//! Layers come from a multi-source breadth-first traversal starting at every
//! node with no incoming connection. A node's layer is the depth at which the
//! traversal first reaches it; visited nodes are never revisited, so cycles
//! and back-edges cannot loop. Nodes the traversal never reaches (cycles with
//! no natural root) are picked up in input order as extra layer-0 roots.
//!
//! Explicitly positioned nodes do not take part: they count for in-degrees
//! but are neither laid out nor traversed through.

use std::collections::{HashMap, VecDeque};

use crate::diagram::{Connection, Node};

use super::config::{LayoutConfig, LayoutDirection};
use super::types::Point;

/// Layer index of every auto-laid-out node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerAssignment {
    layers: Vec<Vec<String>>,
    by_id: HashMap<String, usize>,
}

impl LayerAssignment {
    /// Layer a node was assigned to, `None` for positioned or unknown nodes
    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Node ids per layer, in discovery order
    pub fn layers(&self) -> &[Vec<String>] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of nodes that received a layer
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Assign a layer to every node without an explicit position
///
/// Connections naming unknown nodes are ignored.
pub fn assign_layers(nodes: &[Node], connections: &[Connection]) -> LayerAssignment {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for conn in connections {
        if let (Some(&from), Some(&to)) = (index.get(conn.from.as_str()), index.get(conn.to.as_str()))
        {
            in_degree[to] += 1;
            outgoing[from].push(to);
        }
    }

    let participates = |i: usize| nodes[i].position.is_none();
    let mut depth: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut queue = VecDeque::new();

    let mut visit = |i: usize, d: usize, depth: &mut Vec<Option<usize>>, queue: &mut VecDeque<usize>| {
        depth[i] = Some(d);
        if layers.len() <= d {
            layers.resize_with(d + 1, Vec::new);
        }
        layers[d].push(i);
        queue.push_back(i);
    };

    for i in (0..nodes.len()).filter(|&i| participates(i) && in_degree[i] == 0) {
        visit(i, 0, &mut depth, &mut queue);
    }

    // Nodes never lose their depth, so the search for the next synthetic root
    // resumes where the previous one stopped
    let mut next_root = 0;
    loop {
        while let Some(current) = queue.pop_front() {
            let next_depth = depth[current].map_or(0, |d| d + 1);
            for &next in &outgoing[current] {
                if participates(next) && depth[next].is_none() {
                    visit(next, next_depth, &mut depth, &mut queue);
                }
            }
        }
        while next_root < nodes.len() && !(participates(next_root) && depth[next_root].is_none()) {
            next_root += 1;
        }
        if next_root == nodes.len() {
            break;
        }
        visit(next_root, 0, &mut depth, &mut queue);
    }

    let by_id = depth
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.map(|d| (nodes[i].id.clone(), d)))
        .collect();
    let layers = layers
        .into_iter()
        .map(|layer| layer.into_iter().map(|i| nodes[i].id.clone()).collect())
        .collect();

    LayerAssignment { layers, by_id }
}

/// Compute top-left positions for every node without an explicit position
///
/// Layers advance along the main axis (Y for vertical layouts, X for
/// horizontal ones), each separated from the previous layer's largest node by
/// `level_spacing`. Inside a layer nodes follow each other along the cross
/// axis in discovery order, separated by `node_spacing`. The whole layout is
/// offset by `start_position` plus `layout_margin`.
pub fn layout(nodes: &[Node], connections: &[Connection], config: &LayoutConfig) -> HashMap<String, Point> {
    let assignment = assign_layers(nodes, connections);
    let sizes: HashMap<&str, (f64, f64)> = nodes
        .iter()
        .map(|n| (n.id.as_str(), (n.width, n.height)))
        .collect();
    let vertical = config.layout_direction == LayoutDirection::Vertical;
    // (main, cross) extents
    let extent = |id: &str| {
        let (w, h) = sizes.get(id).copied().unwrap_or_default();
        if vertical {
            (h, w)
        } else {
            (w, h)
        }
    };

    let origin = Point::new(
        config.start_position.x + config.layout_margin,
        config.start_position.y + config.layout_margin,
    );
    let mut positions = HashMap::with_capacity(assignment.len());
    let mut main = 0.0;
    for layer in assignment.layers() {
        let mut cross = 0.0;
        let mut thickest: f64 = 0.0;
        for id in layer {
            let (main_size, cross_size) = extent(id);
            let point = if vertical {
                Point::new(origin.x + cross, origin.y + main)
            } else {
                Point::new(origin.x + main, origin.y + cross)
            };
            positions.insert(id.clone(), point);
            cross += cross_size + config.node_spacing;
            thickest = thickest.max(main_size);
        }
        main += thickest + config.level_spacing;
    }

    tracing::debug!(
        layers = assignment.layer_count(),
        nodes = positions.len(),
        "auto-layout assigned positions"
    );
    positions
}
