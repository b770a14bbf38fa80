//! Node similarity
//!
//! Jaccard overlap of neighbor sets, computed only for pairs that share at
//! least one neighbor. Candidate pairs come from fanning out of each shared
//! neighbor, never from an all-pairs scan.

use citegraph_common::config::SimilaritySettings;
use citegraph_common::metrics;
use citegraph_graph::ProjectedGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::debug;

/// Node similarity configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Keep only the top-k pairs (None = unrestricted)
    pub top_k: Option<usize>,
}

impl From<&SimilaritySettings> for SimilarityConfig {
    fn from(settings: &SimilaritySettings) -> Self {
        Self {
            top_k: settings.top_k,
        }
    }
}

/// One scored pair; `a < b` always
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityPair {
    /// Smaller projected index
    pub a: usize,

    /// Larger projected index
    pub b: usize,

    /// Jaccard similarity, in (0, 1]
    pub score: f64,
}

/// Rank node pairs by Jaccard neighbor overlap.
///
/// Each unordered pair is emitted once with the smaller index first. Only
/// pairs with a shared neighbor (score > 0) appear. Sorted descending by
/// score, ties broken by ascending `(a, b)`, truncated to `top_k`.
pub fn node_similarity(graph: &ProjectedGraph, config: &SimilarityConfig) -> Vec<SimilarityPair> {
    let start = Instant::now();
    let n = graph.node_count();

    // Neighbor sets, self-loops excluded
    let neighbors: Vec<HashSet<usize>> = (0..n)
        .map(|u| {
            graph
                .neighbors(u)
                .iter()
                .map(|&(v, _)| v)
                .filter(|&v| v != u)
                .collect()
        })
        .collect();

    // Nodes pointing at each shared neighbor are the only candidates
    let mut pointed_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (u, set) in neighbors.iter().enumerate() {
        for &v in set {
            pointed_by[v].push(u);
        }
    }

    let mut candidates: BTreeSet<(usize, usize)> = BTreeSet::new();
    for sources in &pointed_by {
        for (i, &a) in sources.iter().enumerate() {
            for &b in &sources[i + 1..] {
                let pair = if a < b { (a, b) } else { (b, a) };
                candidates.insert(pair);
            }
        }
    }

    let mut pairs: Vec<SimilarityPair> = candidates
        .into_iter()
        .map(|(a, b)| {
            let intersection = neighbors[a].intersection(&neighbors[b]).count();
            let union = neighbors[a].len() + neighbors[b].len() - intersection;
            SimilarityPair {
                a,
                b,
                score: intersection as f64 / union as f64,
            }
        })
        .collect();

    pairs.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| x.a.cmp(&y.a))
            .then_with(|| x.b.cmp(&y.b))
    });

    if let Some(k) = config.top_k {
        pairs.truncate(k);
    }

    debug!(nodes = n, pairs = pairs.len(), "Node similarity complete");
    metrics::record_algorithm("node_similarity", start.elapsed().as_secs_f64(), true);

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use citegraph_graph::{
        project, Attributes, EntityLabel, GraphStore, ProjectionSpec, RelationType,
    };

    fn undirected_paper_graph(edges: &[(usize, usize)], n: usize) -> ProjectedGraph {
        let mut store = GraphStore::new();
        let ids: Vec<_> = (0..n)
            .map(|i| {
                store
                    .upsert_entity(EntityLabel::Paper, &format!("p{}", i), Attributes::new())
                    .unwrap()
            })
            .collect();
        for &(a, b) in edges {
            store.connect(ids[a], ids[b], RelationType::RelatedTo, 1.0);
        }
        project(
            &store,
            &ProjectionSpec::undirected(EntityLabel::Paper, vec![RelationType::RelatedTo]),
        )
        .unwrap()
    }

    #[test]
    fn test_shared_neighbors_score_positive() {
        // A(0) and B(1) share neighbors C(2) and D(3); E(4) hangs off B only
        let graph = undirected_paper_graph(&[(0, 2), (0, 3), (1, 2), (1, 3), (1, 4)], 5);
        let pairs = node_similarity(&graph, &SimilarityConfig::default());

        let ab = pairs.iter().find(|p| p.a == 0 && p.b == 1).unwrap();
        // N(A) = {2,3}, N(B) = {2,3,4}: 2 shared of 3
        assert!((ab.score - 2.0 / 3.0).abs() < 1e-9);

        // A and E share no neighbors: pair absent, zero scores are excluded
        assert!(!pairs.iter().any(|p| (p.a, p.b) == (0, 4)));
    }

    #[test]
    fn test_no_self_pairs_and_scores_in_range() {
        let graph = undirected_paper_graph(&[(0, 1), (0, 2), (1, 2), (2, 3), (1, 3)], 4);
        let pairs = node_similarity(&graph, &SimilarityConfig::default());

        assert!(!pairs.is_empty());
        for p in &pairs {
            assert_ne!(p.a, p.b);
            assert!(p.a < p.b, "smaller index listed first");
            assert!(p.score > 0.0 && p.score <= 1.0);
        }
    }

    #[test]
    fn test_identical_neighborhoods_score_one() {
        // 0 and 1 both connect to exactly {2, 3}
        let graph = undirected_paper_graph(&[(0, 2), (0, 3), (1, 2), (1, 3)], 4);
        let pairs = node_similarity(&graph, &SimilarityConfig::default());

        let top = &pairs[0];
        assert_eq!((top.a, top.b), (0, 1));
        assert!((top.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_descending_with_deterministic_ties() {
        let graph = undirected_paper_graph(&[(0, 4), (1, 4), (2, 4), (3, 4)], 5);
        let pairs = node_similarity(&graph, &SimilarityConfig::default());

        // All pairs of {0,1,2,3} tie at score 1.0: ascending (a, b) order
        for w in pairs.windows(2) {
            assert!(w[0].score >= w[1].score);
            if w[0].score == w[1].score {
                assert!((w[0].a, w[0].b) < (w[1].a, w[1].b));
            }
        }
    }

    #[test]
    fn test_top_k_truncates() {
        let graph = undirected_paper_graph(&[(0, 4), (1, 4), (2, 4), (3, 4)], 5);
        let config = SimilarityConfig { top_k: Some(2) };
        let pairs = node_similarity(&graph, &config);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_empty_graph_yields_no_pairs() {
        let graph = undirected_paper_graph(&[], 0);
        assert!(node_similarity(&graph, &SimilarityConfig::default()).is_empty());
    }
}
