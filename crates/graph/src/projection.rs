//! Graph projection
//!
//! Materializes a homogeneous weighted graph from the heterogeneous store:
//! one node label, one or more relationship types folded into a single
//! adjacency, optional orientation collapse. The result is a value the
//! caller owns: immutable, `Send + Sync`, safe to share across concurrent
//! analytics.

use crate::store::{Direction, EntityLabel, GraphStore, NodeId, RelationType};
use citegraph_common::errors::{GraphError, Result};
use citegraph_common::metrics;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Edge orientation of a projection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Edges keep their stored direction
    Directed,
    /// Every edge is mirrored and parallel entries collapse into one
    /// weighted neighbor relation
    Undirected,
}

/// What to project out of the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSpec {
    /// Node label to keep
    pub label: EntityLabel,

    /// Relationship types folded into the projected adjacency
    pub relation_types: Vec<RelationType>,

    /// Orientation of the result
    pub orientation: Orientation,

    /// Edge property used as weight: `"weight"` or `"order"`.
    /// `None` projects every edge at weight 1.0.
    pub weight_key: Option<String>,
}

impl ProjectionSpec {
    /// Directed, unweighted projection
    pub fn new(label: EntityLabel, relation_types: Vec<RelationType>) -> Self {
        Self {
            label,
            relation_types,
            orientation: Orientation::Directed,
            weight_key: None,
        }
    }

    /// Undirected, unweighted projection
    pub fn undirected(label: EntityLabel, relation_types: Vec<RelationType>) -> Self {
        Self {
            label,
            relation_types,
            orientation: Orientation::Undirected,
            weight_key: None,
        }
    }

    /// Use an edge property as the projected weight
    pub fn with_weight_key(mut self, key: &str) -> Self {
        self.weight_key = Some(key.to_string());
        self
    }
}

/// Homogeneous weighted graph snapshot
///
/// Nodes are dense indexes `0..n`, assigned in first-seen store order and
/// stable for a given store snapshot. Built fresh on every `project` call;
/// algorithms only ever read it.
#[derive(Debug, Clone)]
pub struct ProjectedGraph {
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
    orientation: Orientation,
}

impl ProjectedGraph {
    /// Number of projected nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store handle backing a projected index
    pub fn handle(&self, index: usize) -> NodeId {
        self.nodes[index]
    }

    /// Projected index of a store handle
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Weighted neighbors of a projected index
    pub fn neighbors(&self, index: usize) -> &[(usize, f64)] {
        &self.adjacency[index]
    }

    /// Out-degree of a projected index
    pub fn degree(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }

    /// Sum of all adjacency entry weights
    pub fn total_weight(&self) -> f64 {
        self.adjacency
            .iter()
            .flat_map(|edges| edges.iter().map(|(_, w)| w))
            .sum()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

#[derive(Clone, Copy)]
enum WeightMode {
    Unit,
    Stored,
    Ordinal,
}

/// Project a homogeneous weighted graph out of the store.
///
/// A label or relationship type with no matches yields an empty (or
/// edgeless) graph, since an empty analytic result is meaningful. The only
/// failure is a `weight_key` naming a property edges do not carry.
pub fn project(store: &GraphStore, spec: &ProjectionSpec) -> Result<ProjectedGraph> {
    let weight_mode = match spec.weight_key.as_deref() {
        None => WeightMode::Unit,
        Some("weight") => WeightMode::Stored,
        Some("order") => WeightMode::Ordinal,
        Some(key) => {
            return Err(GraphError::InvalidWeightKey {
                key: key.to_string(),
            })
        }
    };

    let start = Instant::now();

    let nodes: Vec<NodeId> = store
        .nodes_with_label(spec.label)
        .map(|n| n.id)
        .collect();
    let index: HashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    // Fold matching edges, summing weights per neighbor pair
    let mut folded: Vec<HashMap<usize, f64>> = vec![HashMap::new(); nodes.len()];

    for (u, &id) in nodes.iter().enumerate() {
        for record in store.records(id, Direction::Outgoing) {
            if !spec.relation_types.contains(&record.rel_type) {
                continue;
            }
            let Some(&v) = index.get(&record.neighbor) else {
                continue;
            };
            let w = match weight_mode {
                WeightMode::Unit => 1.0,
                WeightMode::Stored => record.weight.unwrap_or(1.0),
                WeightMode::Ordinal => record.order.map(|o| o as f64).unwrap_or(1.0),
            };

            *folded[u].entry(v).or_default() += w;
            if spec.orientation == Orientation::Undirected {
                *folded[v].entry(u).or_default() += w;
            }
        }
    }

    // Sorted adjacency keeps iteration deterministic for a given snapshot
    let adjacency: Vec<Vec<(usize, f64)>> = folded
        .into_iter()
        .map(|map| {
            let mut edges: Vec<(usize, f64)> = map.into_iter().collect();
            edges.sort_by_key(|&(v, _)| v);
            edges
        })
        .collect();

    let graph = ProjectedGraph {
        nodes,
        index,
        adjacency,
        orientation: spec.orientation,
    };

    metrics::record_projection(start.elapsed().as_secs_f64());
    debug!(
        label = spec.label.as_str(),
        nodes = graph.node_count(),
        entries = graph.adjacency.iter().map(Vec::len).sum::<usize>(),
        orientation = ?spec.orientation,
        "Projection built"
    );

    Ok(graph)
}
