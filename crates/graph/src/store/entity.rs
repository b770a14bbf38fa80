//! Entity storage
//!
//! Deduplicated collection of typed nodes keyed by natural identifiers
//! (DOI, author name, journal name, keyword term). Keys form one namespace
//! across labels so the key-based connect surface can resolve endpoints
//! without a label.

use super::{Attributes, EntityLabel, NodeId};
use citegraph_common::errors::{GraphError, Result};
use std::collections::HashMap;

/// A typed, uniquely-keyed node
#[derive(Debug, Clone)]
pub struct Node {
    /// Handle of this node
    pub id: NodeId,

    /// Entity label
    pub label: EntityLabel,

    /// Natural identifier, unique across the store
    pub key: String,

    /// Scalar attributes
    pub attributes: Attributes,
}

/// Append-mostly arena of deduplicated entities
#[derive(Debug, Default)]
pub struct EntityStore {
    /// Nodes in insertion order; `NodeId` indexes into this arena
    nodes: Vec<Node>,

    /// Natural key -> handle
    key_index: HashMap<String, NodeId>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or return the existing entity for `(label, key)`.
    ///
    /// On a hit the existing attributes are left untouched (see
    /// [`EntityStore::merge_attributes`] for the explicit overlay). Returns
    /// the handle and whether a node was created. Reusing a key under a
    /// different label is a conflict and leaves the store unchanged.
    pub fn upsert(
        &mut self,
        label: EntityLabel,
        key: &str,
        attributes: Attributes,
    ) -> Result<(NodeId, bool)> {
        if let Some(&id) = self.key_index.get(key) {
            let existing = &self.nodes[id.index()];
            if existing.label != label {
                return Err(GraphError::DuplicateKeyConflict {
                    key: key.to_string(),
                    existing: existing.label.as_str().to_string(),
                    requested: label.as_str().to_string(),
                });
            }
            return Ok((id, false));
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            id,
            label,
            key: key.to_string(),
            attributes,
        });
        self.key_index.insert(key.to_string(), id);

        Ok((id, true))
    }

    /// Look up a handle by label and key
    pub fn get(&self, label: EntityLabel, key: &str) -> Option<NodeId> {
        self.key_index
            .get(key)
            .copied()
            .filter(|id| self.nodes[id.index()].label == label)
    }

    /// Resolve a key regardless of label
    pub fn resolve(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// Borrow a node by handle
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Borrow a node's attributes
    pub fn attributes_of(&self, id: NodeId) -> &Attributes {
        &self.nodes[id.index()].attributes
    }

    /// Overlay attributes onto an existing node, key by key.
    ///
    /// This is the explicit opt-in counterpart to `upsert` leaving existing
    /// attributes untouched.
    pub fn merge_attributes(&mut self, id: NodeId, attributes: Attributes) {
        self.nodes[id.index()].attributes.extend(attributes);
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Handles of all nodes carrying `label`, in insertion order
    pub fn with_label(&self, label: EntityLabel) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.label == label)
    }
}
