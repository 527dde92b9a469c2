//! Configuration for the layout engine

use serde::Deserialize;

use super::error::LayoutError;
use super::pathfinder::MAX_SEARCH_CELLS;
use super::types::{BoundingBox, Point};

/// Axis along which auto-layout stacks its layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Layers grow downwards, nodes within a layer run left to right
    #[default]
    Vertical,
    /// Layers grow rightwards, nodes within a layer run top to bottom
    Horizontal,
}

/// Configuration options for layout and routing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Edge length of a routing grid cell
    pub grid_size: f64,

    /// Clearance kept around every obstacle node
    pub node_padding: f64,

    /// Default clearance between a label's segment and the path ends
    pub min_spacing: f64,

    /// Direction used by auto-layout
    pub layout_direction: LayoutDirection,

    /// Gap between neighbouring nodes of the same layer
    pub node_spacing: f64,

    /// Gap between consecutive layers
    pub level_spacing: f64,

    /// Offset applied to the whole auto-layout
    pub layout_margin: f64,

    /// Origin of the auto-layout, before the margin
    pub start_position: Point,

    /// Largest routing grid that will be allocated; bigger canvases fall back
    /// to direct connections
    pub max_grid_cells: usize,

    /// Area covered by the routing grids; derived from the nodes when unset
    pub canvas_bounds: Option<BoundingBox>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            node_padding: 25.0,
            min_spacing: 35.0,
            layout_direction: LayoutDirection::Vertical,
            node_spacing: 60.0,
            level_spacing: 100.0,
            layout_margin: 50.0,
            start_position: Point::new(0.0, 0.0),
            max_grid_cells: 250_000,
            canvas_bounds: None,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the routing grid cell size
    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the obstacle clearance
    pub fn with_node_padding(mut self, padding: f64) -> Self {
        self.node_padding = padding;
        self
    }

    /// Set the default label clearance
    pub fn with_min_spacing(mut self, spacing: f64) -> Self {
        self.min_spacing = spacing;
        self
    }

    /// Set the auto-layout direction
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    /// Set the spacing between nodes in a layer and between layers
    pub fn with_spacing(mut self, node_spacing: f64, level_spacing: f64) -> Self {
        self.node_spacing = node_spacing;
        self.level_spacing = level_spacing;
        self
    }

    /// Set the layout margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.layout_margin = margin;
        self
    }

    /// Set the auto-layout origin
    pub fn with_start_position(mut self, x: f64, y: f64) -> Self {
        self.start_position = Point::new(x, y);
        self
    }

    /// Set the routing grid cell cap
    pub fn with_max_grid_cells(mut self, cells: usize) -> Self {
        self.max_grid_cells = cells;
        self
    }

    /// Route over a fixed canvas instead of one derived from the nodes
    pub fn with_canvas_bounds(mut self, canvas: BoundingBox) -> Self {
        self.canvas_bounds = Some(canvas);
        self
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(LayoutError::invalid_config(
                "gridSize",
                "must be a positive number",
            ));
        }
        let non_negative = [
            ("nodePadding", self.node_padding),
            ("minSpacing", self.min_spacing),
            ("nodeSpacing", self.node_spacing),
            ("levelSpacing", self.level_spacing),
            ("layoutMargin", self.layout_margin),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::invalid_config(
                    field,
                    "must be a non-negative number",
                ));
            }
        }
        if !self.start_position.x.is_finite() || !self.start_position.y.is_finite() {
            return Err(LayoutError::invalid_config(
                "startPosition",
                "coordinates must be finite",
            ));
        }
        if self.max_grid_cells == 0 || self.max_grid_cells > MAX_SEARCH_CELLS {
            return Err(LayoutError::invalid_config(
                "maxGridCells",
                format!("must be between 1 and {MAX_SEARCH_CELLS}"),
            ));
        }
        if let Some(canvas) = self.canvas_bounds {
            let finite = [canvas.x, canvas.y, canvas.width, canvas.height]
                .iter()
                .all(|v| v.is_finite());
            if !finite || canvas.width <= 0.0 || canvas.height <= 0.0 {
                return Err(LayoutError::invalid_config(
                    "canvasBounds",
                    "must be finite with a positive width and height",
                ));
            }
        }
        Ok(())
    }
}
