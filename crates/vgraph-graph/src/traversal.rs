//! Traversal specifications and the boundary to a traversal executor
//!
//! Callers describe which relationships a traversal may follow as
//! `(type, direction)` steps. Loosely typed argument lists are validated once,
//! in [`TraversalSpec::parse`], and every spec is flattened into an
//! [`Expansion`] before it reaches the backing that executes it.

use crate::node::{NodePrimitives, direction_accepts};
use crate::relationship::{Relationship, RelationshipPrimitives};
use serde::{Deserialize, Serialize};
use std::fmt;
use vgraph_core::{Direction, Error, NodeId, RelationshipType, Result};

/// One element of a flat, alternating `[type, direction, ...]` argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalArg {
    Type(RelationshipType),
    Direction(Direction),
    /// A missing value, as handed over by dynamically typed callers
    Null,
}

impl fmt::Display for TraversalArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalArg::Type(t) => write!(f, "RelationshipType({t})"),
            TraversalArg::Direction(d) => write!(f, "Direction({d})"),
            TraversalArg::Null => f.write_str("null"),
        }
    }
}

impl From<RelationshipType> for TraversalArg {
    fn from(t: RelationshipType) -> Self {
        TraversalArg::Type(t)
    }
}

impl From<Direction> for TraversalArg {
    fn from(d: Direction) -> Self {
        TraversalArg::Direction(d)
    }
}

/// Follow relationships of `rel_type` in `direction`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraversalStep {
    pub rel_type: RelationshipType,
    pub direction: Direction,
}

impl TraversalStep {
    pub fn new<T: Into<RelationshipType>>(rel_type: T, direction: Direction) -> Self {
        Self {
            rel_type: rel_type.into(),
            direction,
        }
    }
}

/// Validated set of steps a traversal may follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalSpec {
    One(TraversalStep),
    Two([TraversalStep; 2]),
    Steps(Vec<TraversalStep>),
}

impl TraversalSpec {
    /// Single step; both fields are required
    pub fn one(rel_type: Option<RelationshipType>, direction: Option<Direction>) -> Result<Self> {
        let Some(direction) = direction else {
            return Err(Error::NullArgument("direction".to_string()));
        };
        let Some(rel_type) = rel_type else {
            return Err(Error::NullArgument("relationship type".to_string()));
        };
        Ok(TraversalSpec::One(TraversalStep { rel_type, direction }))
    }

    /// Two steps; all four fields are required
    pub fn two(
        first_type: Option<RelationshipType>,
        first_direction: Option<Direction>,
        second_type: Option<RelationshipType>,
        second_direction: Option<Direction>,
    ) -> Result<Self> {
        let (first_direction, second_direction) = match (first_direction, second_direction) {
            (Some(first), Some(second)) => (first, second),
            (first, second) => {
                return Err(Error::NullArgument(format!(
                    "direction, first={}, second={}",
                    describe(first.as_ref()),
                    describe(second.as_ref())
                )));
            }
        };
        let (first_type, second_type) = match (first_type, second_type) {
            (Some(first), Some(second)) => (first, second),
            (first, second) => {
                return Err(Error::NullArgument(format!(
                    "relationship type, first={}, second={}",
                    describe(first.as_ref()),
                    describe(second.as_ref())
                )));
            }
        };
        Ok(TraversalSpec::Two([
            TraversalStep::new(first_type, first_direction),
            TraversalStep::new(second_type, second_direction),
        ]))
    }

    /// Validate a flat `[type, direction, type, direction, ...]` list.
    ///
    /// The list must be non-empty and of even length, with a type at every
    /// even position and a direction at every odd one.
    pub fn parse(args: &[TraversalArg]) -> Result<Self> {
        if args.is_empty() || args.len() % 2 != 0 {
            return Err(Error::InvalidArgument(format!(
                "expected [RelationshipType, Direction] pairs, got {} argument(s)",
                args.len()
            )));
        }

        let mut steps = Vec::with_capacity(args.len() / 2);
        for (pair, chunk) in args.chunks_exact(2).enumerate() {
            let position = pair * 2;
            let TraversalArg::Type(rel_type) = &chunk[0] else {
                return Err(unexpected(position, "RelationshipType", &chunk[0]));
            };
            let TraversalArg::Direction(direction) = &chunk[1] else {
                return Err(unexpected(position + 1, "Direction", &chunk[1]));
            };
            steps.push(TraversalStep::new(rel_type.clone(), *direction));
        }
        Ok(TraversalSpec::Steps(steps))
    }

    pub fn steps(&self) -> &[TraversalStep] {
        match self {
            TraversalSpec::One(step) => std::slice::from_ref(step),
            TraversalSpec::Two(steps) => steps.as_slice(),
            TraversalSpec::Steps(steps) => steps.as_slice(),
        }
    }

    /// Split into parallel type and direction arrays, in step order
    pub fn normalize(&self) -> Expansion {
        let (types, directions) = self
            .steps()
            .iter()
            .map(|step| (step.rel_type.clone(), step.direction))
            .unzip();
        Expansion { types, directions }
    }
}

impl From<TraversalStep> for TraversalSpec {
    fn from(step: TraversalStep) -> Self {
        TraversalSpec::One(step)
    }
}

fn describe<T: fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "null".to_string(), ToString::to_string)
}

fn unexpected(position: usize, expected: &str, found: &TraversalArg) -> Error {
    Error::UnexpectedArgument {
        position,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Normalized traversal steps: `types[i]` is followed in `directions[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    types: Vec<RelationshipType>,
    directions: Vec<Direction>,
}

impl Expansion {
    pub fn types(&self) -> &[RelationshipType] {
        &self.types
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&RelationshipType, Direction)> {
        self.types.iter().zip(self.directions.iter().copied())
    }

    /// Whether any step allows following `rel` away from `anchor`
    pub fn allows<R: RelationshipPrimitives>(&self, anchor: NodeId, rel: &Relationship<R>) -> bool {
        self.pairs().any(|(rel_type, direction)| {
            rel.is_type(Some(rel_type)) && direction_accepts(direction, anchor, rel.backing())
        })
    }
}

/// Order in which an executor visits nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    BreadthFirst,
    DepthFirst,
}

/// Which visited nodes an executor returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Returnable {
    #[default]
    All,
    AllButStartNode,
}

/// When to stop expanding and what to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraversalPolicy {
    /// Nodes at this depth are not expanded further. `None` runs to the end
    /// of the graph.
    pub stop_depth: Option<usize>,
    pub returnable: Returnable,
}

impl TraversalPolicy {
    /// Expand until no new nodes are reachable
    pub fn end_of_graph() -> Self {
        Self::default()
    }

    /// Expand the start node only
    pub fn depth_one() -> Self {
        Self {
            stop_depth: Some(1),
            ..Self::default()
        }
    }

    /// Builder: stop at `depth`
    pub fn stop_at(mut self, depth: usize) -> Self {
        self.stop_depth = Some(depth);
        self
    }

    /// Builder: leave the start node out of the result
    pub fn all_but_start_node(mut self) -> Self {
        self.returnable = Returnable::AllButStartNode;
        self
    }
}

/// Traversal execution supplied by a backing
pub trait Traversable: NodePrimitives {
    type Traverser;

    fn execute_traversal(
        &self,
        order: TraversalOrder,
        expansion: &Expansion,
        policy: &TraversalPolicy,
    ) -> Result<Self::Traverser>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::testing::{StubNode, StubRelationship};
    use std::cell::RefCell;

    fn t(name: &str) -> RelationshipType {
        RelationshipType::new(name)
    }

    #[test]
    fn test_parse_and_normalize() {
        let args = [
            TraversalArg::from(t("T1")),
            Direction::Outgoing.into(),
            t("T2").into(),
            Direction::Incoming.into(),
        ];

        let expansion = TraversalSpec::parse(&args).unwrap().normalize();
        assert_eq!(expansion.types(), &[t("T1"), t("T2")]);
        assert_eq!(expansion.directions(), &[Direction::Outgoing, Direction::Incoming]);
        assert_eq!(expansion.len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_arity() {
        let empty = TraversalSpec::parse(&[]).unwrap_err();
        assert!(matches!(empty, Error::InvalidArgument(_)));

        let odd = TraversalSpec::parse(&[
            t("T1").into(),
            Direction::Both.into(),
            t("T2").into(),
        ])
        .unwrap_err();
        assert!(matches!(odd, Error::InvalidArgument(_)));
        assert!(odd.to_string().contains("got 3 argument(s)"));
    }

    #[test]
    fn test_parse_names_offending_position() {
        let err = TraversalSpec::parse(&[t("T1").into(), t("T2").into()]).unwrap_err();
        match err {
            Error::UnexpectedArgument {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 1);
                assert_eq!(expected, "Direction");
                assert_eq!(found, "RelationshipType(T2)");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = TraversalSpec::parse(&[
            t("T1").into(),
            Direction::Outgoing.into(),
            Direction::Incoming.into(),
            Direction::Incoming.into(),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument at position 2: expected RelationshipType, found Direction(INCOMING)"
        );

        let err = TraversalSpec::parse(&[TraversalArg::Null, Direction::Both.into()]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().ends_with("found null"));
    }

    #[test]
    fn test_one_and_two_require_every_field() {
        let one = TraversalSpec::one(Some(t("KNOWS")), Some(Direction::Both)).unwrap();
        assert_eq!(one.steps(), &[TraversalStep::new("KNOWS", Direction::Both)]);

        let missing = TraversalSpec::one(Some(t("KNOWS")), None).unwrap_err();
        assert!(matches!(missing, Error::NullArgument(_)));
        assert!(TraversalSpec::one(None, Some(Direction::Both)).is_err());

        let two = TraversalSpec::two(
            Some(t("A")),
            Some(Direction::Outgoing),
            Some(t("B")),
            Some(Direction::Incoming),
        )
        .unwrap();
        assert_eq!(two.normalize().types(), &[t("A"), t("B")]);

        let err = TraversalSpec::two(Some(t("A")), Some(Direction::Outgoing), None, Some(Direction::Both))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Null argument: relationship type, first=A, second=null"
        );
    }

    #[test]
    fn test_expansion_allows() {
        let expansion = TraversalSpec::parse(&[t("KNOWS").into(), Direction::Outgoing.into()])
            .unwrap()
            .normalize();
        let out = Relationship::new(StubRelationship::new(1, 5, 6, "KNOWS"));
        let inbound = Relationship::new(StubRelationship::new(2, 6, 5, "KNOWS"));
        let other = Relationship::new(StubRelationship::new(3, 5, 6, "OWNS"));

        let anchor = NodeId::from(5);
        assert!(expansion.allows(anchor, &out));
        assert!(!expansion.allows(anchor, &inbound));
        assert!(!expansion.allows(anchor, &other));
    }

    #[test]
    fn test_policy_presets() {
        assert_eq!(TraversalPolicy::end_of_graph().stop_depth, None);
        assert_eq!(TraversalPolicy::depth_one().stop_depth, Some(1));
        let policy = TraversalPolicy::end_of_graph().stop_at(3).all_but_start_node();
        assert_eq!(policy.stop_depth, Some(3));
        assert_eq!(policy.returnable, Returnable::AllButStartNode);
    }

    /// Executor that records what it was handed
    #[derive(Clone)]
    struct Recording {
        inner: StubNode,
        seen: std::rc::Rc<RefCell<Vec<(TraversalOrder, Expansion)>>>,
    }

    impl NodePrimitives for Recording {
        type Relationship = StubRelationship;
        type Relationships = <StubNode as NodePrimitives>::Relationships;

        fn id(&self) -> NodeId {
            self.inner.id()
        }

        fn raw_relationships(&self) -> Self::Relationships {
            self.inner.raw_relationships()
        }
    }

    impl Traversable for Recording {
        type Traverser = usize;

        fn execute_traversal(
            &self,
            order: TraversalOrder,
            expansion: &Expansion,
            _policy: &TraversalPolicy,
        ) -> Result<usize> {
            self.seen.borrow_mut().push((order, expansion.clone()));
            Ok(expansion.len())
        }
    }

    #[test]
    fn test_node_hands_normalized_expansion_to_backing() {
        let backing = Recording {
            inner: StubNode::isolated(1),
            seen: Default::default(),
        };
        let node = Node::new(backing.clone());

        let spec = TraversalSpec::one(Some(t("KNOWS")), Some(Direction::Incoming)).unwrap();
        let steps = node
            .traverse(TraversalOrder::DepthFirst, &spec, &TraversalPolicy::default())
            .unwrap();
        assert_eq!(steps, 1);

        let args = [
            t("A").into(),
            Direction::Both.into(),
            t("B").into(),
            Direction::Outgoing.into(),
        ];
        let steps = node
            .traverse_args(TraversalOrder::BreadthFirst, &args, &TraversalPolicy::depth_one())
            .unwrap();
        assert_eq!(steps, 2);

        let seen = backing.seen.borrow();
        assert_eq!(seen[0].0, TraversalOrder::DepthFirst);
        assert_eq!(seen[0].1.directions(), &[Direction::Incoming]);
        assert_eq!(seen[1].1.types(), &[t("A"), t("B")]);
    }

    #[test]
    fn test_invalid_args_never_reach_backing() {
        let backing = Recording {
            inner: StubNode::isolated(1),
            seen: Default::default(),
        };
        let node = Node::new(backing.clone());

        let result = node.traverse_args(
            TraversalOrder::BreadthFirst,
            &[Direction::Both.into(), t("A").into()],
            &TraversalPolicy::default(),
        );
        assert!(result.unwrap_err().is_invalid_argument());
        assert!(backing.seen.borrow().is_empty());
    }
}
