//! Error types for vgraph
//!
//! One enum covers the derived entity layer and the backings that plug into it.

use crate::types::Direction;
use thiserror::Error;

/// The main error type for vgraph operations
#[derive(Error, Debug)]
pub enum Error {
    // ========== Property Errors ==========
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    // ========== Sequence Errors ==========
    #[error("No more elements in filtered sequence")]
    ExhaustedSequence,

    // ========== Query Errors ==========
    #[error("More than one relationship[{rel_type}, {direction}] found for {node}")]
    AmbiguousResult {
        node: String,
        rel_type: String,
        direction: Direction,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid argument at position {position}: expected {expected}, found {found}")]
    UnexpectedArgument {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Null argument: {0}")]
    NullArgument(String),

    #[error("{node} is not connected to {relationship}")]
    InvalidEndpoint { node: String, relationship: String },

    // ========== Graph Errors ==========
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    #[error("Invalid graph operation: {0}")]
    InvalidGraphOperation(String),

    // ========== Configuration Errors ==========
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for vgraph operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if this error reports an absent property, node or relationship
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PropertyNotFound(_) | Error::NodeNotFound(_) | Error::RelationshipNotFound(_)
        )
    }

    /// Returns true if this error only signals a missing property key.
    ///
    /// This is the one condition the property convenience accessors recover from.
    pub fn is_property_not_found(&self) -> bool {
        matches!(self, Error::PropertyNotFound(_))
    }

    /// Returns true if the caller passed a malformed or missing argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_) | Error::UnexpectedArgument { .. } | Error::NullArgument(_)
        )
    }
}
