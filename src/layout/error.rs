//! Error types for the layout engine

use thiserror::Error;

/// Configuration errors that abort a diagram build
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Two nodes share the same id
    #[error("duplicate node id '{id}'")]
    DuplicateNode { id: String },

    /// A connection references a node that does not exist
    #[error("connection #{connection} references undefined node '{name}'")]
    UndefinedNode {
        name: String,
        connection: usize,
        suggestions: Vec<String>,
    },

    /// A connection starts and ends on the same node
    #[error("connection #{connection} loops from node '{id}' back to itself")]
    SelfLoop { id: String, connection: usize },

    /// A node with unusable geometry
    #[error("invalid node '{id}': {reason}")]
    InvalidNode { id: String, reason: String },

    /// A configuration value the engine cannot work with
    #[error("invalid config value '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl LayoutError {
    /// Create an undefined node error with suggestions
    pub fn undefined(name: impl Into<String>, connection: usize, suggestions: Vec<String>) -> Self {
        Self::UndefinedNode {
            name: name.into(),
            connection,
            suggestions,
        }
    }

    /// Create a duplicate node error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Create a self-loop error
    pub fn self_loop(id: impl Into<String>, connection: usize) -> Self {
        Self::SelfLoop {
            id: id.into(),
            connection,
        }
    }

    /// Create an invalid node error
    pub fn invalid_node(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Index of the offending connection, if the error concerns one
    pub fn connection(&self) -> Option<usize> {
        match self {
            Self::UndefinedNode { connection, .. } | Self::SelfLoop { connection, .. } => {
                Some(*connection)
            }
            _ => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UndefinedNode { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}
