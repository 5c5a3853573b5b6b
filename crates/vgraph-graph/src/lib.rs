//! vgraph Graph Layer
//!
//! Derived node and relationship APIs built on a small set of primitive
//! operations, plus an in-memory backing that supplies them.
//!
//! # Overview
//!
//! A backing implements [`NodePrimitives`] and [`RelationshipPrimitives`]
//! (and optionally [`Traversable`] and
//! [`PropertyContainer`](vgraph_core::PropertyContainer)). Wrapping its
//! handles in [`Node`] and [`Relationship`] provides:
//! - Filtered relationship queries by type and direction
//! - Single-relationship lookup with ambiguity detection
//! - Identity-based equality, hashing and ordering across backings
//! - Traversal specifications validated before they reach the backing

pub mod memory;
pub mod node;
pub mod options;
pub mod relationship;
pub mod traversal;

#[cfg(test)]
mod testing;

pub use memory::{MemoryGraph, MemoryNode, MemoryRelationship};
pub use node::{Node, NodePrimitives, RawRelationships, RelationshipFilter, Relationships};
pub use options::GraphOptions;
pub use relationship::{Relationship, RelationshipPrimitives};
pub use traversal::{
    Expansion, Returnable, Traversable, TraversalArg, TraversalOrder, TraversalPolicy,
    TraversalSpec, TraversalStep,
};
