//! CiteGraph analytics
//!
//! The three analytic algorithms of the engine, operating read-only over a
//! [`ProjectedGraph`](citegraph_graph::ProjectedGraph):
//! - PageRank centrality
//! - Louvain community detection
//! - Pairwise node similarity (Jaccard neighbor overlap)
//!
//! A projection is immutable and `Send + Sync`, so any number of these may
//! run concurrently over the same snapshot.

mod louvain;
mod pagerank;
mod similarity;

pub use louvain::{louvain, LouvainConfig, LouvainOutcome};
pub use pagerank::{pagerank, PageRankConfig, PageRankOutcome};
pub use similarity::{node_similarity, SimilarityConfig, SimilarityPair};

use citegraph_graph::NodeId;
use serde::{Deserialize, Serialize};

/// Node with a centrality score, for ranked reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredNode {
    /// Projected index
    pub index: usize,

    /// Store handle backing the index
    pub node: NodeId,

    /// Centrality score
    pub score: f64,
}
