//! vgraph - derived graph entity layer
//!
//! This is the main library crate that re-exports all vgraph components.

pub use vgraph_core as core;
pub use vgraph_graph as graph;

// Re-export commonly used types
pub use vgraph_core::{
    Direction, EntityId, Error, GraphEntity, GraphId, Identity, LazyFilter, NodeId, Property,
    PropertyContainer, PropertyValue, RelationshipId, RelationshipType, Result,
};

pub use vgraph_graph::{
    GraphOptions, MemoryGraph, Node, NodePrimitives, Relationship, RelationshipPrimitives,
    Traversable, TraversalArg, TraversalOrder, TraversalPolicy, TraversalSpec,
};
