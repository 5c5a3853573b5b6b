//! Core graph types for vgraph
//!
//! Relationship type labels and traversal directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type label of a relationship.
///
/// Type labels are compared by name, so two independently created labels
/// with the same name are the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipType(String);

impl RelationshipType {
    /// Create a new relationship type
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// Get the type name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Convert to owned string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for RelationshipType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelationshipType {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a relationship, relative to the node it is queried from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// The node is the start of the relationship (->)
    Outgoing,
    /// The node is the end of the relationship (<-)
    Incoming,
    /// Either end (--)
    Both,
}

impl Direction {
    /// Returns the opposite direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }

    /// Upper-case name, as used in error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Outgoing => "OUTGOING",
            Direction::Incoming => "INCOMING",
            Direction::Both => "BOTH",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
