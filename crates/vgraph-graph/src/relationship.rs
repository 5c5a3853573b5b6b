//! Relationship entity built on a backing's primitive operations

use crate::node::{Node, NodePrimitives};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use vgraph_core::{
    EntityId, EntityKind, Error, GraphEntity, InternalId, NodeId, PropertyContainer,
    PropertyValue, RelationshipId, RelationshipType, Result,
};

/// Primitive operations a backing must supply for relationships.
///
/// Identity, endpoints and type are fixed when the relationship is created.
pub trait RelationshipPrimitives {
    type Node: NodePrimitives;

    fn id(&self) -> RelationshipId;

    fn start_node(&self) -> Self::Node;

    fn end_node(&self) -> Self::Node;

    fn rel_type(&self) -> &RelationshipType;

    /// Id of the start node. Backings that know it without materializing the
    /// node should override this.
    fn start_node_id(&self) -> NodeId {
        self.start_node().id()
    }

    /// Id of the end node
    fn end_node_id(&self) -> NodeId {
        self.end_node().id()
    }
}

/// A relationship with the full derived API, over any backing `R`
#[derive(Clone)]
pub struct Relationship<R> {
    backing: R,
}

impl<R> Relationship<R> {
    pub fn new(backing: R) -> Self {
        Self { backing }
    }

    /// The backing this relationship delegates to
    pub fn backing(&self) -> &R {
        &self.backing
    }

    pub fn into_backing(self) -> R {
        self.backing
    }
}

impl<R: RelationshipPrimitives> Relationship<R> {
    pub fn id(&self) -> RelationshipId {
        self.backing.id()
    }

    pub fn rel_type(&self) -> &RelationshipType {
        self.backing.rel_type()
    }

    pub fn start_node(&self) -> Node<R::Node> {
        Node::new(self.backing.start_node())
    }

    pub fn end_node(&self) -> Node<R::Node> {
        Node::new(self.backing.end_node())
    }

    /// Both endpoints as `(start, end)`
    pub fn nodes(&self) -> (Node<R::Node>, Node<R::Node>) {
        (self.start_node(), self.end_node())
    }

    /// The endpoint opposite to `node`.
    ///
    /// For a self-loop the node itself is returned. Fails with
    /// [`Error::InvalidEndpoint`] if `node` is not an endpoint.
    pub fn other_node<N: NodePrimitives>(&self, node: &Node<N>) -> Result<Node<R::Node>> {
        let id = node.id();
        if self.backing.start_node_id() == id {
            Ok(self.end_node())
        } else if self.backing.end_node_id() == id {
            Ok(self.start_node())
        } else {
            Err(Error::InvalidEndpoint {
                node: node.to_string(),
                relationship: self.to_string(),
            })
        }
    }

    /// True iff `candidate` is present and has the same name as this
    /// relationship's type
    pub fn is_type(&self, candidate: Option<&RelationshipType>) -> bool {
        candidate.is_some_and(|t| t.name() == self.rel_type().name())
    }
}

impl<R: RelationshipPrimitives> GraphEntity for Relationship<R> {
    const KIND: EntityKind = EntityKind::Relationship;

    fn raw_id(&self) -> InternalId {
        self.id().as_internal()
    }
}

impl<R, S> PartialEq<Relationship<S>> for Relationship<R>
where
    R: RelationshipPrimitives,
    S: RelationshipPrimitives,
{
    fn eq(&self, other: &Relationship<S>) -> bool {
        self.identity() == other.identity()
    }
}

impl<R: RelationshipPrimitives> Eq for Relationship<R> {}

/// Always false: kinds differ
impl<R, N> PartialEq<Node<N>> for Relationship<R>
where
    R: RelationshipPrimitives,
    N: NodePrimitives,
{
    fn eq(&self, other: &Node<N>) -> bool {
        self.identity() == other.identity()
    }
}

impl<R, S> PartialOrd<Relationship<S>> for Relationship<R>
where
    R: RelationshipPrimitives,
    S: RelationshipPrimitives,
{
    fn partial_cmp(&self, other: &Relationship<S>) -> Option<Ordering> {
        Some(self.identity().cmp(&other.identity()))
    }
}

impl<R: RelationshipPrimitives> Ord for Relationship<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl<R: RelationshipPrimitives> Hash for Relationship<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl<R: RelationshipPrimitives> fmt::Debug for Relationship<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("id", &self.id())
            .field("rel_type", self.rel_type())
            .field("start", &self.backing.start_node_id())
            .field("end", &self.backing.end_node_id())
            .finish()
    }
}

/// `Relationship[7] KNOWS (Node[1] -> Node[2])`
impl<R: RelationshipPrimitives> fmt::Display for Relationship<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (Node[{}] -> Node[{}])",
            self.identity(),
            self.rel_type(),
            self.backing.start_node_id(),
            self.backing.end_node_id()
        )
    }
}

impl<R: PropertyContainer> PropertyContainer for Relationship<R> {
    fn property(&self, key: &str) -> Result<PropertyValue> {
        self.backing.property(key)
    }

    fn set_property(&self, key: &str, value: PropertyValue) -> Result<()> {
        self.backing.set_property(key, value)
    }

    fn remove_property(&self, key: &str) -> Result<PropertyValue> {
        self.backing.remove_property(key)
    }

    fn property_keys(&self) -> Result<Vec<String>> {
        self.backing.property_keys()
    }

    fn property_values(&self) -> Result<Vec<PropertyValue>> {
        self.backing.property_values()
    }

    fn property_or(&self, key: &str, fallback: PropertyValue) -> Result<PropertyValue> {
        self.backing.property_or(key, fallback)
    }

    fn has_property(&self, key: &str) -> Result<bool> {
        self.backing.has_property(key)
    }
}
