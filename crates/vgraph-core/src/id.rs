//! Entity identification types for vgraph
//!
//! Nodes and relationships carry plain numeric ids; the typed wrappers keep
//! the two id spaces from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Internal numeric ID shared by all entity kinds
pub type InternalId = u64;

/// Trait for all entity identifiers
pub trait EntityId:
    Clone + Copy + Eq + Ord + std::hash::Hash + fmt::Debug + fmt::Display
{
    /// Create from internal numeric ID
    fn from_internal(id: InternalId) -> Self;

    /// Get the internal numeric representation
    fn as_internal(&self) -> InternalId;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(InternalId);

        impl EntityId for $name {
            fn from_internal(id: InternalId) -> Self {
                Self(id)
            }

            fn as_internal(&self) -> InternalId {
                self.0
            }
        }

        impl From<InternalId> for $name {
            fn from(id: InternalId) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier for a graph instance
    GraphId
);

entity_id!(
    /// Identifier for a node, unique among the nodes of one graph
    NodeId
);

entity_id!(
    /// Identifier for a relationship, unique among the relationships of one graph
    RelationshipId
);

impl GraphId {
    /// Derive a graph ID from the graph name
    pub fn from_name(name: &str) -> Self {
        Self(xxhash_rust::xxh3::xxh3_64(name.as_bytes()))
    }
}

/// Sequential identifier generator for the entities of one graph
#[derive(Debug)]
pub struct IdGenerator {
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
}

impl IdGenerator {
    /// Create a generator starting at 1 for both id spaces
    pub fn new() -> Self {
        Self::with_start(1, 1)
    }

    /// Create with explicit starting values
    pub fn with_start(node_start: InternalId, rel_start: InternalId) -> Self {
        Self {
            next_node_id: AtomicU64::new(node_start),
            next_rel_id: AtomicU64::new(rel_start),
        }
    }

    /// Generate the next node ID
    pub fn next_node_id(&self) -> NodeId {
        NodeId(self.next_node_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Generate the next relationship ID
    pub fn next_relationship_id(&self) -> RelationshipId {
        RelationshipId(self.next_rel_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Value the next node ID will take
    pub fn current_node_id(&self) -> InternalId {
        self.next_node_id.load(Ordering::SeqCst)
    }

    /// Value the next relationship ID will take
    pub fn current_relationship_id(&self) -> InternalId {
        self.next_rel_id.load(Ordering::SeqCst)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_from_internal() {
        let id = NodeId::from_internal(42);
        assert_eq!(id.as_internal(), 42);
        assert_eq!(format!("{:?}", id), "NodeId(42)");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_ordering_is_numeric() {
        assert!(NodeId::from(2) < NodeId::from(10));
        assert!(RelationshipId::from(9) > RelationshipId::from(3));
    }

    #[test]
    fn test_graph_id_from_name() {
        let id1 = GraphId::from_name("test_graph");
        let id2 = GraphId::from_name("test_graph");
        let id3 = GraphId::from_name("other_graph");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_generator() {
        let id_gen = IdGenerator::new();

        let n1 = id_gen.next_node_id();
        let n2 = id_gen.next_node_id();
        assert_eq!(n1.as_internal() + 1, n2.as_internal());

        let r1 = id_gen.next_relationship_id();
        assert_eq!(r1.as_internal(), 1);
        assert_eq!(id_gen.current_relationship_id(), 2);
    }

    #[test]
    fn test_id_generator_with_start() {
        let id_gen = IdGenerator::with_start(100, 200);
        assert_eq!(id_gen.next_node_id().as_internal(), 100);
        assert_eq!(id_gen.next_relationship_id().as_internal(), 200);
        assert_eq!(id_gen.current_node_id(), 101);
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let json = serde_json::to_string(&NodeId::from(5)).unwrap();
        assert_eq!(json, "5");
    }
}
