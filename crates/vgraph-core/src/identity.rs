//! Identity shared by every graph entity
//!
//! Nodes and relationships are equal, hashed and ordered purely by their
//! numeric id. The entity kind keeps the two id spaces apart, so a node never
//! equals a relationship that happens to carry the same number.

use crate::id::{EntityId, InternalId, NodeId, RelationshipId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a graph entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Node,
    Relationship,
}

impl EntityKind {
    /// Category name used in the canonical string form
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Node => "Node",
            EntityKind::Relationship => "Relationship",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a graph entity: its kind plus its numeric id.
///
/// Ordering compares the kind first, then the id numerically, so within one
/// kind it is plain numeric order of ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity {
    kind: EntityKind,
    id: InternalId,
}

impl Identity {
    /// Create an identity from a kind and a raw id
    pub fn new(kind: EntityKind, id: InternalId) -> Self {
        Self { kind, id }
    }

    /// Identity of a node
    pub fn node(id: NodeId) -> Self {
        Self::new(EntityKind::Node, id.as_internal())
    }

    /// Identity of a relationship
    pub fn relationship(id: RelationshipId) -> Self {
        Self::new(EntityKind::Relationship, id.as_internal())
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> InternalId {
        self.id
    }
}

impl From<NodeId> for Identity {
    fn from(id: NodeId) -> Self {
        Self::node(id)
    }
}

impl From<RelationshipId> for Identity {
    fn from(id: RelationshipId) -> Self {
        Self::relationship(id)
    }
}

/// Canonical short form, e.g. `Node[42]`
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.id)
    }
}

/// Anything that has a graph identity.
///
/// Entity wrappers implement `PartialEq`, `Hash` and `Ord` by delegating to
/// [`GraphEntity::identity`], which keeps the rules in one place.
pub trait GraphEntity {
    /// The kind every value of this type reports
    const KIND: EntityKind;

    /// Raw numeric id of this entity
    fn raw_id(&self) -> InternalId;

    /// Kind plus id
    fn identity(&self) -> Identity {
        Identity::new(Self::KIND, self.raw_id())
    }
}
