//! In-memory graph backing
//!
//! [`MemoryGraph`] owns the graph state. [`MemoryNode`] and
//! [`MemoryRelationship`] are cheap handles onto it that implement the
//! primitive traits, so [`Node`] and [`Relationship`] work on top of them.

use crate::node::{Node, NodePrimitives};
use crate::options::GraphOptions;
use crate::relationship::{Relationship, RelationshipPrimitives};
use crate::traversal::{Expansion, Returnable, Traversable, TraversalOrder, TraversalPolicy};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use vgraph_core::{
    Error, GraphId, IdGenerator, NodeId, Property, PropertyContainer, PropertyValue,
    RelationshipId, RelationshipType, Result,
};

#[derive(Debug, Default)]
struct NodeRecord {
    properties: Property,
    /// Incident relationships in creation order, each listed once
    relationships: Vec<RelationshipId>,
}

#[derive(Debug)]
struct RelationshipRecord {
    start: NodeId,
    end: NodeId,
    rel_type: RelationshipType,
    properties: Property,
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: HashMap<NodeId, NodeRecord>,
    relationships: HashMap<RelationshipId, RelationshipRecord>,
}

impl GraphState {
    fn node(&self, id: NodeId) -> Result<&NodeRecord> {
        self.nodes
            .get(&id)
            .ok_or_else(|| Error::NodeNotFound(format!("{:?}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| Error::NodeNotFound(format!("{:?}", id)))
    }

    fn relationship(&self, id: RelationshipId) -> Result<&RelationshipRecord> {
        self.relationships
            .get(&id)
            .ok_or_else(|| Error::RelationshipNotFound(format!("{:?}", id)))
    }

    fn relationship_mut(&mut self, id: RelationshipId) -> Result<&mut RelationshipRecord> {
        self.relationships
            .get_mut(&id)
            .ok_or_else(|| Error::RelationshipNotFound(format!("{:?}", id)))
    }

    /// Unlink a relationship from both endpoints and drop it
    fn unlink(&mut self, id: RelationshipId) -> Option<RelationshipRecord> {
        let record = self.relationships.remove(&id)?;
        for endpoint in [record.start, record.end] {
            if let Some(node) = self.nodes.get_mut(&endpoint) {
                node.relationships.retain(|r| *r != id);
            }
        }
        Some(record)
    }
}

/// A graph held entirely in memory.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct MemoryGraph {
    id: GraphId,
    options: Arc<GraphOptions>,
    id_gen: Arc<IdGenerator>,
    state: Arc<RwLock<GraphState>>,
}

impl MemoryGraph {
    /// Open an empty graph
    pub fn open(options: GraphOptions) -> Result<Self> {
        options.validate()?;
        let graph = Self {
            id: GraphId::from_name(&options.name),
            id_gen: Arc::new(IdGenerator::with_start(
                options.first_node_id,
                options.first_relationship_id,
            )),
            options: Arc::new(options),
            state: Arc::new(RwLock::new(GraphState::default())),
        };
        debug!("Opened graph {} ({:?})", graph.options.name, graph.id);
        Ok(graph)
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, GraphState>> {
        self.state
            .read()
            .map_err(|_| Error::Internal("Failed to acquire graph lock".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, GraphState>> {
        self.state
            .write()
            .map_err(|_| Error::Internal("Failed to acquire graph lock".to_string()))
    }

    fn node_handle(&self, id: NodeId) -> Node<MemoryNode> {
        Node::new(MemoryNode {
            graph: self.clone(),
            id,
        })
    }

    fn relationship_handle(
        &self,
        id: RelationshipId,
        record: &RelationshipRecord,
    ) -> MemoryRelationship {
        MemoryRelationship {
            graph: self.clone(),
            id,
            start: record.start,
            end: record.end,
            rel_type: record.rel_type.clone(),
        }
    }

    // ========== Node Operations ==========

    /// Create a node without properties
    pub fn create_node(&self) -> Result<Node<MemoryNode>> {
        self.create_node_with_properties(Property::new())
    }

    /// Create a node with initial properties
    pub fn create_node_with_properties(&self, properties: Property) -> Result<Node<MemoryNode>> {
        let mut state = self.write_state()?;
        let id = self.id_gen.next_node_id();
        state.nodes.insert(
            id,
            NodeRecord {
                properties,
                relationships: Vec::new(),
            },
        );
        debug!("Created node {:?} in graph {}", id, self.name());
        Ok(self.node_handle(id))
    }

    /// Look up a live node
    pub fn node(&self, id: NodeId) -> Result<Option<Node<MemoryNode>>> {
        let state = self.read_state()?;
        Ok(state.nodes.contains_key(&id).then(|| self.node_handle(id)))
    }

    /// Delete a node that has no relationships.
    ///
    /// Returns `false` if the node does not exist.
    pub fn delete_node(&self, id: NodeId) -> Result<bool> {
        let mut state = self.write_state()?;
        let Some(record) = state.nodes.get(&id) else {
            return Ok(false);
        };
        if !record.relationships.is_empty() {
            return Err(Error::InvalidGraphOperation(format!(
                "Cannot delete node {:?}: has {} relationships. Use detach_delete_node instead.",
                id,
                record.relationships.len()
            )));
        }
        state.nodes.remove(&id);
        debug!("Deleted node {:?} in graph {}", id, self.name());
        Ok(true)
    }

    /// Delete a node together with all of its relationships
    pub fn detach_delete_node(&self, id: NodeId) -> Result<bool> {
        let mut state = self.write_state()?;
        let Some(record) = state.nodes.get(&id) else {
            return Ok(false);
        };
        let incident = record.relationships.clone();
        for rel_id in &incident {
            state.unlink(*rel_id);
        }
        state.nodes.remove(&id);
        debug!(
            "Detach-deleted node {:?} and {} relationships in graph {}",
            id,
            incident.len(),
            self.name()
        );
        Ok(true)
    }

    pub fn node_count(&self) -> Result<usize> {
        Ok(self.read_state()?.nodes.len())
    }

    // ========== Relationship Operations ==========

    /// Create a relationship `start -[rel_type]-> end`.
    ///
    /// Both endpoints must exist. `start == end` creates a self-loop.
    pub fn create_relationship<T: Into<RelationshipType>>(
        &self,
        start: NodeId,
        rel_type: T,
        end: NodeId,
    ) -> Result<Relationship<MemoryRelationship>> {
        let mut state = self.write_state()?;
        state.node(start)?;
        state.node(end)?;

        let id = self.id_gen.next_relationship_id();
        let record = RelationshipRecord {
            start,
            end,
            rel_type: rel_type.into(),
            properties: Property::new(),
        };
        let handle = self.relationship_handle(id, &record);

        state.node_mut(start)?.relationships.push(id);
        if end != start {
            state.node_mut(end)?.relationships.push(id);
        }
        state.relationships.insert(id, record);

        debug!(
            "Created relationship {:?} ({:?} -> {:?}) in graph {}",
            id,
            start,
            end,
            self.name()
        );
        Ok(Relationship::new(handle))
    }

    /// Look up a live relationship
    pub fn relationship(&self, id: RelationshipId) -> Result<Option<Relationship<MemoryRelationship>>> {
        let state = self.read_state()?;
        Ok(state
            .relationships
            .get(&id)
            .map(|record| Relationship::new(self.relationship_handle(id, record))))
    }

    /// Delete a relationship. Returns `false` if it does not exist.
    pub fn delete_relationship(&self, id: RelationshipId) -> Result<bool> {
        let mut state = self.write_state()?;
        let deleted = state.unlink(id).is_some();
        if deleted {
            debug!("Deleted relationship {:?} in graph {}", id, self.name());
        }
        Ok(deleted)
    }

    pub fn relationship_count(&self) -> Result<usize> {
        Ok(self.read_state()?.relationships.len())
    }
}

impl fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("id", &self.id)
            .field("name", &self.options.name)
            .finish()
    }
}

/// Handle to a node of a [`MemoryGraph`]
#[derive(Clone)]
pub struct MemoryNode {
    graph: MemoryGraph,
    id: NodeId,
}

impl MemoryNode {
    pub fn graph(&self) -> &MemoryGraph {
        &self.graph
    }
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoryNode").field(&self.id).finish()
    }
}

impl NodePrimitives for MemoryNode {
    type Relationship = MemoryRelationship;
    type Relationships = std::vec::IntoIter<MemoryRelationship>;

    fn id(&self) -> NodeId {
        self.id
    }

    /// Snapshot of the incident relationships; empty once the node is deleted
    fn raw_relationships(&self) -> Self::Relationships {
        let state = self
            .graph
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(record) = state.nodes.get(&self.id) else {
            return Vec::new().into_iter();
        };
        record
            .relationships
            .iter()
            .filter_map(|id| {
                let rel = state.relationships.get(id)?;
                Some(self.graph.relationship_handle(*id, rel))
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl Traversable for MemoryNode {
    type Traverser = Vec<Node<MemoryNode>>;

    fn execute_traversal(
        &self,
        order: TraversalOrder,
        expansion: &Expansion,
        policy: &TraversalPolicy,
    ) -> Result<Self::Traverser> {
        let state = self.graph.read_state()?;
        state.node(self.id)?;

        let max_depth = self.graph.options.max_traversal_depth;
        let stop_depth = policy.stop_depth.map_or(max_depth, |d| d.min(max_depth));

        let mut visited = HashSet::new();
        let mut pending = VecDeque::from([(self.id, 0usize)]);
        let mut found = Vec::new();

        loop {
            let next = match order {
                TraversalOrder::BreadthFirst => pending.pop_front(),
                TraversalOrder::DepthFirst => pending.pop_back(),
            };
            let Some((id, depth)) = next else { break };
            if !visited.insert(id) {
                continue;
            }
            if depth > 0 || policy.returnable == Returnable::All {
                found.push(id);
            }
            if depth >= stop_depth {
                continue;
            }
            let Some(record) = state.nodes.get(&id) else {
                continue;
            };

            let mut neighbours = Vec::new();
            for rel_id in &record.relationships {
                let Some(rel) = state.relationships.get(rel_id) else {
                    continue;
                };
                let handle = Relationship::new(self.graph.relationship_handle(*rel_id, rel));
                if !expansion.allows(id, &handle) {
                    continue;
                }
                let other = if rel.start == id { rel.end } else { rel.start };
                if !visited.contains(&other) {
                    neighbours.push((other, depth + 1));
                }
            }
            // stack order: first created is explored first
            if order == TraversalOrder::DepthFirst {
                neighbours.reverse();
            }
            pending.extend(neighbours);
        }

        debug!(
            "Traversal from {:?} visited {} nodes in graph {}",
            self.id,
            visited.len(),
            self.graph.name()
        );
        Ok(found.into_iter().map(|id| self.graph.node_handle(id)).collect())
    }
}

/// Handle to a relationship of a [`MemoryGraph`]
#[derive(Clone)]
pub struct MemoryRelationship {
    graph: MemoryGraph,
    id: RelationshipId,
    start: NodeId,
    end: NodeId,
    rel_type: RelationshipType,
}

impl fmt::Debug for MemoryRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoryRelationship").field(&self.id).finish()
    }
}

impl RelationshipPrimitives for MemoryRelationship {
    type Node = MemoryNode;

    fn id(&self) -> RelationshipId {
        self.id
    }

    fn start_node(&self) -> MemoryNode {
        MemoryNode {
            graph: self.graph.clone(),
            id: self.start,
        }
    }

    fn end_node(&self) -> MemoryNode {
        MemoryNode {
            graph: self.graph.clone(),
            id: self.end,
        }
    }

    fn rel_type(&self) -> &RelationshipType {
        &self.rel_type
    }

    fn start_node_id(&self) -> NodeId {
        self.start
    }

    fn end_node_id(&self) -> NodeId {
        self.end
    }
}

/// Property access through the graph lock. `$lookup`/`$lookup_mut` resolve
/// the handle's record and fail once the entity has been deleted.
macro_rules! impl_property_container {
    ($handle:ty, $lookup:ident, $lookup_mut:ident) => {
        impl PropertyContainer for $handle {
            fn property(&self, key: &str) -> Result<PropertyValue> {
                let state = self.graph.read_state()?;
                state
                    .$lookup(self.id)?
                    .properties
                    .get(key)
                    .cloned()
                    .ok_or_else(|| Error::PropertyNotFound(key.to_string()))
            }

            fn set_property(&self, key: &str, value: PropertyValue) -> Result<()> {
                let mut state = self.graph.write_state()?;
                state.$lookup_mut(self.id)?.properties.set(key, value);
                Ok(())
            }

            fn remove_property(&self, key: &str) -> Result<PropertyValue> {
                let mut state = self.graph.write_state()?;
                state
                    .$lookup_mut(self.id)?
                    .properties
                    .remove(key)
                    .ok_or_else(|| Error::PropertyNotFound(key.to_string()))
            }

            fn property_keys(&self) -> Result<Vec<String>> {
                let state = self.graph.read_state()?;
                Ok(state.$lookup(self.id)?.properties.keys().cloned().collect())
            }

            fn property_values(&self) -> Result<Vec<PropertyValue>> {
                let state = self.graph.read_state()?;
                Ok(state.$lookup(self.id)?.properties.values().cloned().collect())
            }
        }
    };
}

impl_property_container!(MemoryNode, node, node_mut);
impl_property_container!(MemoryRelationship, relationship, relationship_mut);
