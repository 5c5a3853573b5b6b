//! Minimal backings used by the unit tests

use crate::node::NodePrimitives;
use crate::relationship::RelationshipPrimitives;
use std::cell::Cell;
use std::rc::Rc;
use vgraph_core::{EntityId, NodeId, RelationshipId, RelationshipType};

/// Node over a fixed relationship list that counts every relationship pulled
#[derive(Debug, Clone)]
pub struct StubNode {
    id: NodeId,
    relationships: Rc<Vec<StubRelationship>>,
    pulls: Rc<Cell<usize>>,
}

impl StubNode {
    pub fn new(id: u64, relationships: Vec<StubRelationship>) -> Self {
        Self {
            id: NodeId::from(id),
            relationships: Rc::new(relationships),
            pulls: Rc::new(Cell::new(0)),
        }
    }

    pub fn isolated(id: u64) -> Self {
        Self::new(id, Vec::new())
    }

    /// Relationships pulled from this node so far, across all iterations
    pub fn pulls(&self) -> usize {
        self.pulls.get()
    }
}

pub struct CountingIter {
    relationships: Rc<Vec<StubRelationship>>,
    position: usize,
    pulls: Rc<Cell<usize>>,
}

impl Iterator for CountingIter {
    type Item = StubRelationship;

    fn next(&mut self) -> Option<Self::Item> {
        let rel = self.relationships.get(self.position)?.clone();
        self.position += 1;
        self.pulls.set(self.pulls.get() + 1);
        Some(rel)
    }
}

impl NodePrimitives for StubNode {
    type Relationship = StubRelationship;
    type Relationships = CountingIter;

    fn id(&self) -> NodeId {
        self.id
    }

    fn raw_relationships(&self) -> Self::Relationships {
        CountingIter {
            relationships: Rc::clone(&self.relationships),
            position: 0,
            pulls: Rc::clone(&self.pulls),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StubRelationship {
    id: RelationshipId,
    start: NodeId,
    end: NodeId,
    rel_type: RelationshipType,
}

impl StubRelationship {
    pub fn new(id: u64, start: u64, end: u64, rel_type: &str) -> Self {
        Self {
            id: RelationshipId::from(id),
            start: NodeId::from(start),
            end: NodeId::from(end),
            rel_type: RelationshipType::new(rel_type),
        }
    }
}

impl RelationshipPrimitives for StubRelationship {
    type Node = StubNode;

    fn id(&self) -> RelationshipId {
        self.id
    }

    fn start_node(&self) -> StubNode {
        StubNode::isolated(self.start.as_internal())
    }

    fn end_node(&self) -> StubNode {
        StubNode::isolated(self.end.as_internal())
    }

    fn rel_type(&self) -> &RelationshipType {
        &self.rel_type
    }
}

/// A second, unrelated node backing with no relationships
#[derive(Debug, Clone)]
pub struct BareNode(pub NodeId);

impl NodePrimitives for BareNode {
    type Relationship = StubRelationship;
    type Relationships = std::iter::Empty<StubRelationship>;

    fn id(&self) -> NodeId {
        self.0
    }

    fn raw_relationships(&self) -> Self::Relationships {
        std::iter::empty()
    }
}
