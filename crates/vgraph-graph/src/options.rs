//! Configuration for in-memory graphs

use serde::{Deserialize, Serialize};
use vgraph_core::{Error, InternalId, Result};

/// Options for a [`MemoryGraph`](crate::MemoryGraph)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Name of the graph; the graph id is derived from it
    pub name: String,

    /// Id handed to the first node created
    pub first_node_id: InternalId,

    /// Id handed to the first relationship created
    pub first_relationship_id: InternalId,

    /// Hard limit on traversal depth, applied on top of any traversal policy
    pub max_traversal_depth: usize,
}

impl GraphOptions {
    /// Default options for a graph called `name`
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Small limits for tests
    pub fn for_testing() -> Self {
        Self {
            name: "test".to_string(),
            first_node_id: 1,
            first_relationship_id: 1,
            max_traversal_depth: 16,
        }
    }

    /// Load options from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("Invalid graph options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Set the first node id
    pub fn first_node_id(mut self, id: InternalId) -> Self {
        self.first_node_id = id;
        self
    }

    /// Set the first relationship id
    pub fn first_relationship_id(mut self, id: InternalId) -> Self {
        self.first_relationship_id = id;
        self
    }

    /// Set the traversal depth limit
    pub fn max_traversal_depth(mut self, depth: usize) -> Self {
        self.max_traversal_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Configuration("Graph name must not be empty".to_string()));
        }
        if self.max_traversal_depth == 0 {
            return Err(Error::Configuration(
                "max_traversal_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            first_node_id: 1,
            first_relationship_id: 1,
            max_traversal_depth: 1024,
        }
    }
}
