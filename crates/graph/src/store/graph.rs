//! Combined graph store facade
//!
//! The ingestion and query surface the engine exposes to external
//! collaborators: upsert entities, connect edges by key or handle, read
//! adjacency and attributes. The store is single-writer; callers that share
//! it across threads wrap it in an `RwLock` and hold the read guard for the
//! duration of a projection.

use super::{
    Attributes, ConnectOutcome, Direction, EntityLabel, EntityStore, Node, NodeId, RelationType,
    RelationshipStore,
};
use citegraph_common::errors::{GraphError, Result};
use citegraph_common::metrics;
use tracing::debug;

/// Heterogeneous property graph: entities plus relationships
#[derive(Debug, Default)]
pub struct GraphStore {
    entities: EntityStore,
    relationships: RelationshipStore,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ── Ingestion surface ────────────────────────────────────────────────

    /// Insert or fetch the entity for `(label, key)`.
    ///
    /// Existing attributes are left untouched on a hit; use
    /// [`GraphStore::merge_attributes`] to overlay explicitly.
    pub fn upsert_entity(
        &mut self,
        label: EntityLabel,
        key: &str,
        attributes: Attributes,
    ) -> Result<NodeId> {
        let (id, created) = self.entities.upsert(label, key, attributes)?;
        if created {
            self.relationships.ensure_node(id);
            debug!(label = label.as_str(), key, id = id.index(), "Entity created");
        }
        metrics::record_entity_upsert(label.as_str(), created);
        Ok(id)
    }

    /// Overlay attributes onto an existing entity
    pub fn merge_attributes(&mut self, id: NodeId, attributes: Attributes) {
        self.entities.merge_attributes(id, attributes);
    }

    /// Connect two entities by handle
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: RelationType,
        initial_weight: f64,
    ) -> ConnectOutcome {
        let outcome = self
            .relationships
            .connect(source, target, rel_type, initial_weight);
        match outcome {
            ConnectOutcome::SelfLoop => metrics::record_self_loop_rejected(rel_type.as_str()),
            _ => metrics::record_edge_connect(rel_type.as_str(), outcome.as_str()),
        }
        outcome
    }

    /// Connect two entities by natural key.
    ///
    /// Upsert-before-connect is the caller's contract: an unresolved key is
    /// a structural error and no dangling edge is created.
    pub fn connect_keys(
        &mut self,
        source_key: &str,
        target_key: &str,
        rel_type: RelationType,
        weight_delta: f64,
    ) -> Result<ConnectOutcome> {
        let source = self.require(source_key)?;
        let target = self.require(target_key)?;
        Ok(self.connect(source, target, rel_type, weight_delta))
    }

    /// Connect by handle with an ordinal property (set on creation only)
    pub fn connect_with_order(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: RelationType,
        order: i64,
    ) -> ConnectOutcome {
        let outcome = self
            .relationships
            .connect_with_order(source, target, rel_type, order);
        match outcome {
            ConnectOutcome::SelfLoop => metrics::record_self_loop_rejected(rel_type.as_str()),
            _ => metrics::record_edge_connect(rel_type.as_str(), outcome.as_str()),
        }
        outcome
    }

    // ── Query surface ────────────────────────────────────────────────────

    /// Look up a handle by label and key
    pub fn get(&self, label: EntityLabel, key: &str) -> Option<NodeId> {
        self.entities.get(label, key)
    }

    /// Borrow a node by handle
    pub fn node(&self, id: NodeId) -> &Node {
        self.entities.node(id)
    }

    /// Borrow a node's attributes
    pub fn attributes_of(&self, id: NodeId) -> &Attributes {
        self.entities.attributes_of(id)
    }

    /// Neighbors with weights along one relationship type (or every type)
    pub fn edges_of(
        &self,
        id: NodeId,
        rel_type: Option<RelationType>,
        direction: Direction,
    ) -> Vec<(NodeId, f64)> {
        self.relationships.edges_of(id, rel_type, direction)
    }

    /// Neighbors with weights along any of `rel_types`
    pub fn edges_matching(
        &self,
        id: NodeId,
        rel_types: &[RelationType],
        direction: Direction,
    ) -> Vec<(NodeId, f64)> {
        self.relationships.edges_matching(id, rel_types, direction)
    }

    /// Raw edge records for one endpoint (projection input)
    pub fn records(&self, id: NodeId, direction: Direction) -> &[super::EdgeRecord] {
        self.relationships.records(id, direction)
    }

    /// Degree along one relationship type
    pub fn degree(&self, id: NodeId, rel_type: RelationType, direction: Direction) -> usize {
        self.relationships.degree(id, rel_type, direction)
    }

    /// All nodes in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Node> {
        self.entities.iter()
    }

    /// Nodes carrying `label`, in insertion order
    pub fn nodes_with_label(&self, label: EntityLabel) -> impl Iterator<Item = &Node> {
        self.entities.with_label(label)
    }

    pub fn node_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.relationships.edge_count()
    }

    fn require(&self, key: &str) -> Result<NodeId> {
        self.entities
            .resolve(key)
            .ok_or_else(|| GraphError::UnknownEntity {
                key: key.to_string(),
            })
    }
}
