//! vgraph Core Library
//!
//! Fundamental types shared by every part of vgraph: typed identifiers,
//! entity identity, relationship types and directions, properties, the
//! error taxonomy, and the lazy filtering primitive that derived
//! relationship queries are built on.
//!
//! # Modules
//!
//! - `error` - Error types and result alias
//! - `filter` - Lazy, single-lookahead filtering over re-openable sequences
//! - `id` - Typed identifiers and id generation
//! - `identity` - Identity-based equality, hashing and ordering
//! - `property` - Property values and the property container contract
//! - `types` - Relationship types and directions

pub mod error;
pub mod filter;
pub mod id;
pub mod identity;
pub mod property;
pub mod types;

pub use error::{Error, Result};
pub use filter::{FilterCursor, LazyFilter, Predicate, Source, from_fn};
pub use id::{EntityId, GraphId, IdGenerator, InternalId, NodeId, RelationshipId};
pub use identity::{EntityKind, GraphEntity, Identity};
pub use property::{Property, PropertyContainer, PropertyValue};
pub use types::{Direction, RelationshipType};
