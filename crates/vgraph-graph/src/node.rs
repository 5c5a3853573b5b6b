//! Node entity built on a backing's primitive operations
//!
//! A backing only has to list a node's relationships and report its id.
//! [`Node`] derives every relationship query from those two primitives by
//! running one [`RelationshipFilter`] over one [`LazyFilter`]; new filter
//! dimensions only change the predicate.

use crate::relationship::{Relationship, RelationshipPrimitives};
use crate::traversal::{Traversable, TraversalArg, TraversalOrder, TraversalPolicy, TraversalSpec};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use tracing::trace;
use vgraph_core::{
    Direction, EntityId, EntityKind, Error, GraphEntity, InternalId, LazyFilter, NodeId,
    Predicate, PropertyContainer, PropertyValue, RelationshipType, Result, Source,
};

/// Primitive operations a backing must supply for nodes
pub trait NodePrimitives {
    type Relationship: RelationshipPrimitives;

    /// Iterator returned by [`raw_relationships`](Self::raw_relationships)
    type Relationships: Iterator<Item = Self::Relationship>;

    /// Stable id, unique among nodes
    fn id(&self) -> NodeId;

    /// Every relationship this node is an endpoint of, in backing order.
    ///
    /// Each call starts a new, independent iteration. It may be produced
    /// lazily.
    fn raw_relationships(&self) -> Self::Relationships;
}

/// Re-openable sequence of a node's relationships, wrapped for the derived API
pub struct RawRelationships<'a, B>(&'a B);

impl<B: NodePrimitives> Source for RawRelationships<'_, B> {
    type Item = Relationship<B::Relationship>;
    type Iter = iter::Map<B::Relationships, fn(B::Relationship) -> Relationship<B::Relationship>>;

    fn open(&self) -> Self::Iter {
        self.0
            .raw_relationships()
            .map(Relationship::new as fn(B::Relationship) -> Relationship<B::Relationship>)
    }
}

/// Filtered relationships of one node
pub type Relationships<'a, B> = LazyFilter<RawRelationships<'a, B>, RelationshipFilter>;

/// Predicate selecting relationships by direction relative to an anchor
/// node, and optionally by type name
#[derive(Debug, Clone)]
pub struct RelationshipFilter {
    anchor: NodeId,
    direction: Direction,
    types: Option<HashSet<String>>,
}

impl RelationshipFilter {
    /// Accept every type in `direction` relative to `anchor`
    pub fn new(anchor: NodeId, direction: Direction) -> Self {
        Self {
            anchor,
            direction,
            types: None,
        }
    }

    /// Restrict to the given types. An empty list leaves types unrestricted.
    pub fn with_types<'t, I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = &'t RelationshipType>,
    {
        let names: HashSet<String> = types.into_iter().map(|t| t.name().to_string()).collect();
        self.types = if names.is_empty() { None } else { Some(names) };
        self
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Test a backing relationship against this filter
    pub fn matches<R: RelationshipPrimitives>(&self, rel: &R) -> bool {
        if !direction_accepts(self.direction, self.anchor, rel) {
            return false;
        }
        match &self.types {
            Some(names) => names.contains(rel.rel_type().name()),
            None => true,
        }
    }
}

impl<R: RelationshipPrimitives> Predicate<Relationship<R>> for RelationshipFilter {
    fn accepts(&self, item: &Relationship<R>) -> bool {
        self.matches(item.backing())
    }
}

/// Whether `rel` runs in `direction` as seen from `anchor`
pub(crate) fn direction_accepts<R: RelationshipPrimitives>(
    direction: Direction,
    anchor: NodeId,
    rel: &R,
) -> bool {
    match direction {
        Direction::Outgoing => rel.start_node_id() == anchor,
        Direction::Incoming => rel.end_node_id() == anchor,
        Direction::Both => true,
    }
}

/// A node with the full derived API, over any backing `B`
#[derive(Clone)]
pub struct Node<B> {
    backing: B,
}

impl<B> Node<B> {
    pub fn new(backing: B) -> Self {
        Self { backing }
    }

    /// The backing this node delegates to
    pub fn backing(&self) -> &B {
        &self.backing
    }

    pub fn into_backing(self) -> B {
        self.backing
    }
}

impl<B: NodePrimitives> Node<B> {
    pub fn id(&self) -> NodeId {
        self.backing.id()
    }

    fn filtered(&self, filter: RelationshipFilter) -> Relationships<'_, B> {
        LazyFilter::new(RawRelationships(&self.backing), filter)
    }

    /// All relationships of this node
    pub fn relationships(&self) -> Relationships<'_, B> {
        self.filtered(RelationshipFilter::new(self.id(), Direction::Both))
    }

    /// Relationships whose type is one of `types`; all of them when `types`
    /// is empty
    pub fn relationships_of_types(&self, types: &[RelationshipType]) -> Relationships<'_, B> {
        self.filtered(RelationshipFilter::new(self.id(), Direction::Both).with_types(types))
    }

    /// Relationships running in `direction` relative to this node
    pub fn relationships_in(&self, direction: Direction) -> Relationships<'_, B> {
        self.filtered(RelationshipFilter::new(self.id(), direction))
    }

    /// Relationships of one type running in `direction`
    pub fn relationships_of(
        &self,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Relationships<'_, B> {
        self.filtered(RelationshipFilter::new(self.id(), direction).with_types([rel_type]))
    }

    /// The only relationship of `rel_type` in `direction`.
    ///
    /// `Ok(None)` when there is none; [`Error::AmbiguousResult`] when there
    /// is more than one. Stops pulling after the second match.
    pub fn single_relationship(
        &self,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Result<Option<Relationship<B::Relationship>>> {
        let matches = self.relationships_of(rel_type, direction);
        let mut cursor = matches.cursor();
        let Some(first) = cursor.next() else {
            return Ok(None);
        };
        if cursor.has_next() {
            return Err(Error::AmbiguousResult {
                node: self.to_string(),
                rel_type: rel_type.name().to_string(),
                direction,
            });
        }
        Ok(Some(first))
    }

    pub fn has_relationship(&self) -> bool {
        self.relationships().has_any()
    }

    pub fn has_relationship_of_types(&self, types: &[RelationshipType]) -> bool {
        self.relationships_of_types(types).has_any()
    }

    pub fn has_relationship_in(&self, direction: Direction) -> bool {
        self.relationships_in(direction).has_any()
    }

    pub fn has_relationship_of(&self, rel_type: &RelationshipType, direction: Direction) -> bool {
        self.relationships_of(rel_type, direction).has_any()
    }

    /// Run a traversal from this node through the backing's executor.
    ///
    /// The steps are flattened into parallel type and direction
    /// arrays before it is handed over.
    pub fn traverse(
        &self,
        order: TraversalOrder,
        spec: &TraversalSpec,
        policy: &TraversalPolicy,
    ) -> Result<B::Traverser>
    where
        B: Traversable,
    {
        let expansion = spec.normalize();
        trace!(
            node = %self,
            steps = expansion.len(),
            ?order,
            "handing traversal to backing"
        );
        self.backing.execute_traversal(order, &expansion, policy)
    }

    /// [`traverse`](Self::traverse) with a flat, alternating
    /// `[type, direction, ...]` argument list
    pub fn traverse_args(
        &self,
        order: TraversalOrder,
        args: &[TraversalArg],
        policy: &TraversalPolicy,
    ) -> Result<B::Traverser>
    where
        B: Traversable,
    {
        let spec = TraversalSpec::parse(args)?;
        self.traverse(order, &spec, policy)
    }
}

impl<B: NodePrimitives> GraphEntity for Node<B> {
    const KIND: EntityKind = EntityKind::Node;

    fn raw_id(&self) -> InternalId {
        self.id().as_internal()
    }
}

impl<A, C> PartialEq<Node<C>> for Node<A>
where
    A: NodePrimitives,
    C: NodePrimitives,
{
    fn eq(&self, other: &Node<C>) -> bool {
        self.identity() == other.identity()
    }
}

impl<B: NodePrimitives> Eq for Node<B> {}

/// Always false: kinds differ
impl<B, R> PartialEq<Relationship<R>> for Node<B>
where
    B: NodePrimitives,
    R: RelationshipPrimitives,
{
    fn eq(&self, other: &Relationship<R>) -> bool {
        self.identity() == other.identity()
    }
}

impl<A, C> PartialOrd<Node<C>> for Node<A>
where
    A: NodePrimitives,
    C: NodePrimitives,
{
    fn partial_cmp(&self, other: &Node<C>) -> Option<Ordering> {
        Some(self.identity().cmp(&other.identity()))
    }
}

impl<B: NodePrimitives> Ord for Node<B> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl<B: NodePrimitives> Hash for Node<B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl<B: NodePrimitives> fmt::Debug for Node<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.id()).finish()
    }
}

/// `Node[42]`
impl<B: NodePrimitives> fmt::Display for Node<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity())
    }
}

impl<B: PropertyContainer> PropertyContainer for Node<B> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubNode, StubRelationship};
    use std::collections::hash_map::DefaultHasher;

    fn t(name: &str) -> RelationshipType {
        RelationshipType::new(name)
    }

    fn ids<B: NodePrimitives>(rels: &Relationships<'_, B>) -> Vec<u64> {
        rels.cursor().map(|r| r.id().as_internal()).collect()
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    /// Node 2 with relationships (1 -> 2 KNOWS), (2 -> 1 LIKES), (2 -> 3 KNOWS), (3 -> 2 OWNS)
    fn hub() -> Node<StubNode> {
        Node::new(StubNode::new(
            2,
            vec![
                StubRelationship::new(10, 1, 2, "KNOWS"),
                StubRelationship::new(11, 2, 1, "LIKES"),
                StubRelationship::new(12, 2, 3, "KNOWS"),
                StubRelationship::new(13, 3, 2, "OWNS"),
            ],
        ))
    }

    #[test]
    fn test_relationships_by_direction() {
        let node = hub();

        assert_eq!(ids(&node.relationships_in(Direction::Outgoing)), vec![11, 12]);
        assert_eq!(ids(&node.relationships_in(Direction::Incoming)), vec![10, 13]);
        assert_eq!(ids(&node.relationships_in(Direction::Both)), vec![10, 11, 12, 13]);
        assert_eq!(ids(&node.relationships()), vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_relationships_by_types() {
        let node = hub();

        assert_eq!(ids(&node.relationships_of_types(&[t("KNOWS")])), vec![10, 12]);
        assert_eq!(
            ids(&node.relationships_of_types(&[t("OWNS"), t("LIKES")])),
            vec![11, 13]
        );
        assert_eq!(ids(&node.relationships_of_types(&[])), vec![10, 11, 12, 13]);
        assert!(ids(&node.relationships_of_types(&[t("HATES")])).is_empty());
    }

    #[test]
    fn test_relationships_by_type_and_direction() {
        let node = hub();

        assert_eq!(ids(&node.relationships_of(&t("KNOWS"), Direction::Outgoing)), vec![12]);
        assert_eq!(ids(&node.relationships_of(&t("KNOWS"), Direction::Incoming)), vec![10]);
        assert_eq!(ids(&node.relationships_of(&t("KNOWS"), Direction::Both)), vec![10, 12]);
        assert!(ids(&node.relationships_of(&t("OWNS"), Direction::Outgoing)).is_empty());
    }

    #[test]
    fn test_repeated_iteration_is_independent() {
        let node = hub();
        let knows = node.relationships_of(&t("KNOWS"), Direction::Both);

        assert_eq!(ids(&knows), vec![10, 12]);
        assert_eq!(ids(&knows), vec![10, 12]);
    }

    #[test]
    fn test_has_relationship_outgoing() {
        // viewed from B with (A -> B T1), (B -> A T2)
        let b = Node::new(StubNode::new(
            2,
            vec![
                StubRelationship::new(1, 1, 2, "T1"),
                StubRelationship::new(2, 2, 1, "T2"),
            ],
        ));
        assert!(b.has_relationship_in(Direction::Outgoing));
        assert!(b.has_relationship_in(Direction::Incoming));

        let only_incoming = Node::new(StubNode::new(2, vec![StubRelationship::new(1, 1, 2, "T1")]));
        assert!(!only_incoming.has_relationship_in(Direction::Outgoing));
        assert!(only_incoming.has_relationship_of(&t("T1"), Direction::Incoming));
        assert!(!only_incoming.has_relationship_of_types(&[t("T2")]));
    }

    #[test]
    fn test_has_relationship_short_circuits() {
        let backing = StubNode::new(
            1,
            (0..50).map(|i| StubRelationship::new(i, 1, 2, "KNOWS")).collect(),
        );
        let node = Node::new(backing.clone());

        assert!(node.has_relationship());
        assert_eq!(backing.pulls(), 1);
        assert!(!Node::new(StubNode::isolated(9)).has_relationship());
    }

    #[test]
    fn test_single_relationship() {
        let node = hub();

        let only = node.single_relationship(&t("LIKES"), Direction::Both).unwrap();
        assert_eq!(only.map(|r| r.id().as_internal()), Some(11));

        let outgoing_knows = node.single_relationship(&t("KNOWS"), Direction::Outgoing).unwrap();
        assert_eq!(outgoing_knows.map(|r| r.id().as_internal()), Some(12));

        assert!(node.single_relationship(&t("HATES"), Direction::Both).unwrap().is_none());
    }

    #[test]
    fn test_single_relationship_ambiguous() {
        let node = hub();

        let err = node.single_relationship(&t("KNOWS"), Direction::Both).unwrap_err();
        assert_eq!(
            err.to_string(),
            "More than one relationship[KNOWS, BOTH] found for Node[2]"
        );
    }

    #[test]
    fn test_single_relationship_stops_after_second_match() {
        let mut rels = vec![
            StubRelationship::new(1, 5, 6, "T1"),
            StubRelationship::new(2, 5, 7, "OTHER"),
            StubRelationship::new(3, 8, 5, "T1"),
        ];
        rels.extend((4..100).map(|i| StubRelationship::new(i, 5, 9, "OTHER")));
        let backing = StubNode::new(5, rels);
        let node = Node::new(backing.clone());

        let result = node.single_relationship(&t("T1"), Direction::Both);
        assert!(matches!(result, Err(Error::AmbiguousResult { .. })));
        assert_eq!(backing.pulls(), 3);
    }

    #[test]
    fn test_equality_across_backings() {
        let stub = Node::new(StubNode::isolated(42));
        let other_backing = Node::new(crate::testing::BareNode(NodeId::from(42)));

        assert!(stub == other_backing);
        assert_eq!(stub.partial_cmp(&other_backing), Some(Ordering::Equal));

        assert_eq!(hash_of(&stub), hash_of(&other_backing));
    }

    #[test]
    fn test_node_never_equals_relationship() {
        let node = Node::new(StubNode::isolated(7));
        let rel = Relationship::new(StubRelationship::new(7, 7, 7, "SELF"));
        assert!(node != rel);
    }

    #[test]
    fn test_ordering_by_id() {
        let mut nodes = vec![
            Node::new(StubNode::isolated(30)),
            Node::new(StubNode::isolated(4)),
            Node::new(StubNode::isolated(12)),
        ];
        nodes.sort();
        let ordered: Vec<_> = nodes.iter().map(|n| n.id().as_internal()).collect();
        assert_eq!(ordered, vec![4, 12, 30]);
    }

    #[test]
    fn test_display() {
        let node = Node::new(StubNode::isolated(42));
        assert_eq!(node.to_string(), "Node[42]");
        assert_eq!(format!("{node:?}"), "Node(NodeId(42))");
    }
}
