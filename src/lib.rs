//! Flowchart Layout - automatic node placement and orthogonal connector routing
//!
//! This library turns a flowchart description (nodes with sizes, connections
//! between them) into a render model: a position for every node, an
//! obstacle-avoiding orthogonal polyline for every connection and a placement
//! for every connection label. It does no drawing itself.
//!
//! # Example
//!
//! ```rust
//! use flowchart_layout::{build, Connection, Diagram, Node};
//!
//! let diagram = Diagram::new()
//!     .with_node(Node::new("start", 120.0, 40.0))
//!     .with_node(Node::new("end", 120.0, 40.0))
//!     .with_connection(Connection::new("start", "end").with_label("done"));
//!
//! let model = build(&diagram).unwrap();
//! assert_eq!(model.connection_paths.len(), 1);
//! assert!(model.node_position("end").is_some());
//! ```

pub mod diagram;
pub mod error;
pub mod layout;

pub use diagram::{AnchorName, Connection, Diagram, Node, NodeGeometry};
pub use error::LoadError;
pub use layout::{
    build, build_with, ConnectionPath, LabelPlacement, LayoutConfig, LayoutDirection,
    LayoutError, Point, RenderModel, Side,
};

use std::path::Path;

use thiserror::Error;

/// Errors that can occur between reading a diagram and producing its model
#[derive(Debug, Error)]
pub enum BuildError {
    /// The diagram description could not be read or parsed
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// The diagram was read but is not a valid flowchart
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Build the render model for a TOML diagram description
///
/// # Example
///
/// ```rust
/// use flowchart_layout::build_from_toml;
///
/// let model = build_from_toml(r#"
///     [[nodes]]
///     id = "a"
///     width = 100
///     height = 40
///
///     [[nodes]]
///     id = "b"
///     width = 100
///     height = 40
///
///     [[connections]]
///     from = "a"
///     to = "b"
///     label = "next"
/// "#).unwrap();
///
/// assert_eq!(model.node_positions.len(), 2);
/// assert_eq!(model.label_placements[0].text, "next");
/// ```
pub fn build_from_toml(content: &str) -> Result<RenderModel, BuildError> {
    let diagram = Diagram::from_toml_str(content)?;
    Ok(build(&diagram)?)
}

/// Build the render model for a TOML diagram file
pub fn build_from_file(path: &Path) -> Result<RenderModel, BuildError> {
    let diagram = Diagram::from_file(path)?;
    Ok(build(&diagram)?)
}
