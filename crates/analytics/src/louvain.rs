//! Louvain community detection
//!
//! Multi-level modularity optimization: greedy local moves until no move
//! improves modularity, then aggregation of communities into super-nodes,
//! repeated until a level produces no merge. Aggregation self-loops are
//! retained for later levels but never surface in the node-level result.

use citegraph_common::config::LouvainSettings;
use citegraph_common::metrics;
use citegraph_graph::ProjectedGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Louvain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LouvainConfig {
    /// Maximum local-move sweeps per level
    pub max_local_sweeps: usize,

    /// Maximum aggregation levels
    pub max_levels: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            max_local_sweeps: 50,
            max_levels: 10,
        }
    }
}

impl From<&LouvainSettings> for LouvainConfig {
    fn from(settings: &LouvainSettings) -> Self {
        Self {
            max_local_sweeps: settings.max_local_sweeps,
            max_levels: settings.max_levels,
        }
    }
}

/// Louvain result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LouvainOutcome {
    /// Community id per projected index; dense `0..community_count`,
    /// numbered in order of first appearance
    pub communities: Vec<usize>,

    /// Number of communities
    pub community_count: usize,

    /// Modularity of the final partition
    pub modularity: f64,

    /// Aggregation levels performed
    pub levels: usize,

    /// False when a cap (sweeps or levels) fired while moves/merges were
    /// still happening; the partition is still returned
    pub converged: bool,
}

/// Symmetric working graph for one level.
///
/// `adj` holds distinct-neighbor entries (mirrored, no self entries);
/// `self_w` holds self-loop weight, counted twice in a node's degree.
struct LevelGraph {
    adj: Vec<Vec<(usize, f64)>>,
    self_w: Vec<f64>,
}

impl LevelGraph {
    fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Weighted degrees and their total (2m)
    fn degrees(&self) -> (Vec<f64>, f64) {
        let k: Vec<f64> = (0..self.node_count())
            .map(|u| {
                let arcs: f64 = self.adj[u].iter().map(|(_, w)| w).sum();
                arcs + 2.0 * self.self_w[u]
            })
            .collect();
        let m2 = k.iter().sum();
        (k, m2)
    }
}

/// Detect communities via Louvain modularity optimization.
///
/// Local sweeps visit nodes in index order and break gain ties by lowest
/// community id, so the result is deterministic for a given projection.
pub fn louvain(graph: &ProjectedGraph, config: &LouvainConfig) -> LouvainOutcome {
    let start = Instant::now();
    let n = graph.node_count();

    if n == 0 {
        return LouvainOutcome {
            communities: Vec::new(),
            community_count: 0,
            modularity: 0.0,
            levels: 0,
            converged: true,
        };
    }

    // Symmetrize the projected adjacency. An undirected projection already
    // carries both directions; the uniform doubling this produces leaves
    // modularity unchanged.
    let mut level = symmetrize(graph);
    let original = LevelGraph {
        adj: level.adj.clone(),
        self_w: level.self_w.clone(),
    };

    // Per original node, its community in the current level's id space
    let mut assignment: Vec<usize> = (0..n).collect();
    let mut levels = 0;
    let mut converged = true;

    for level_index in 0..config.max_levels {
        levels += 1;

        let (comm, local_converged) = local_moves(&level, config.max_local_sweeps);
        converged &= local_converged;

        let (dense, community_count) = renumber(&comm);
        for slot in assignment.iter_mut() {
            *slot = dense[comm[*slot]];
        }

        if community_count == level.node_count() {
            // No merge in this level: done
            break;
        }

        level = aggregate(&level, &comm, &dense, community_count);

        if level_index + 1 == config.max_levels {
            // Cap fired while levels were still merging
            converged = false;
        }
    }

    // Final dense renumbering in order of first appearance
    let (final_dense, community_count) = renumber(&assignment);
    let communities: Vec<usize> = assignment.iter().map(|&c| final_dense[c]).collect();

    let modularity = modularity_of(&original, &communities);

    if !converged {
        warn!(
            levels,
            community_count, "Louvain hit a cap before converging; partition is approximate"
        );
    }
    debug!(nodes = n, community_count, levels, modularity, "Louvain complete");
    metrics::record_algorithm("louvain", start.elapsed().as_secs_f64(), converged);

    LouvainOutcome {
        communities,
        community_count,
        modularity,
        levels,
        converged,
    }
}

fn symmetrize(graph: &ProjectedGraph) -> LevelGraph {
    let n = graph.node_count();
    let mut pair: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];
    let mut self_w = vec![0.0; n];

    for u in 0..n {
        for &(v, w) in graph.neighbors(u) {
            if v == u {
                self_w[u] += w;
            } else {
                *pair[u].entry(v).or_default() += w;
                *pair[v].entry(u).or_default() += w;
            }
        }
    }

    let adj = pair
        .into_iter()
        .map(|map| {
            let mut edges: Vec<(usize, f64)> = map.into_iter().collect();
            edges.sort_by_key(|&(v, _)| v);
            edges
        })
        .collect();

    LevelGraph { adj, self_w }
}

/// Phase 1: greedy local moves until a full sweep moves nothing
fn local_moves(level: &LevelGraph, max_sweeps: usize) -> (Vec<usize>, bool) {
    let n = level.node_count();
    let (k, m2) = level.degrees();

    let mut comm: Vec<usize> = (0..n).collect();
    let mut sigma_tot = k.clone();

    if m2 == 0.0 {
        // No edges: everyone keeps their own community
        return (comm, true);
    }

    let mut converged = false;
    for _ in 0..max_sweeps {
        let mut moved = false;

        for i in 0..n {
            let current = comm[i];

            // Edge weight from i into each neighboring community
            let mut neigh: HashMap<usize, f64> = HashMap::new();
            for &(j, w) in &level.adj[i] {
                *neigh.entry(comm[j]).or_default() += w;
            }

            // Take i out of its community before evaluating gains
            sigma_tot[current] -= k[i];

            let w_current = neigh.get(&current).copied().unwrap_or(0.0);
            let mut best_comm = current;
            let mut best_gain = w_current - sigma_tot[current] * k[i] / m2;

            // Ascending candidate order + strict improvement = lowest
            // community id wins ties
            let mut candidates: Vec<(usize, f64)> = neigh.into_iter().collect();
            candidates.sort_by_key(|&(c, _)| c);

            for (c, w_ic) in candidates {
                if c == current {
                    continue;
                }
                let gain = w_ic - sigma_tot[c] * k[i] / m2;
                if gain > best_gain {
                    best_gain = gain;
                    best_comm = c;
                }
            }

            sigma_tot[best_comm] += k[i];
            if best_comm != current {
                comm[i] = best_comm;
                moved = true;
            }
        }

        if !moved {
            converged = true;
            break;
        }
    }

    (comm, converged)
}

/// Dense renumbering in order of first appearance; returns the mapping
/// (indexed by old id) and the community count
fn renumber(comm: &[usize]) -> (Vec<usize>, usize) {
    let capacity = comm.iter().copied().max().map_or(0, |m| m + 1);
    let mut dense = vec![usize::MAX; capacity];
    let mut next = 0;

    for &c in comm {
        if dense[c] == usize::MAX {
            dense[c] = next;
            next += 1;
        }
    }

    (dense, next)
}

/// Phase 2: collapse each community into a super-node, summing edge
/// weights; intra-community weight becomes a retained self-loop
fn aggregate(
    level: &LevelGraph,
    comm: &[usize],
    dense: &[usize],
    community_count: usize,
) -> LevelGraph {
    let mut pair: Vec<HashMap<usize, f64>> = vec![HashMap::new(); community_count];
    let mut self_w = vec![0.0; community_count];
    let mut internal_arcs = vec![0.0; community_count];

    for i in 0..level.node_count() {
        let ci = dense[comm[i]];
        self_w[ci] += level.self_w[i];
        for &(j, w) in &level.adj[i] {
            let cj = dense[comm[j]];
            if ci == cj {
                internal_arcs[ci] += w;
            } else {
                *pair[ci].entry(cj).or_default() += w;
            }
        }
    }

    // Mirrored arcs count every internal pair twice
    for (c, arcs) in internal_arcs.into_iter().enumerate() {
        self_w[c] += arcs / 2.0;
    }

    let adj = pair
        .into_iter()
        .map(|map| {
            let mut edges: Vec<(usize, f64)> = map.into_iter().collect();
            edges.sort_by_key(|&(v, _)| v);
            edges
        })
        .collect();

    LevelGraph { adj, self_w }
}

/// Modularity of a partition over the finest-level working graph
fn modularity_of(level: &LevelGraph, communities: &[usize]) -> f64 {
    let (k, m2) = level.degrees();
    if m2 == 0.0 {
        return 0.0;
    }

    let community_count = communities.iter().copied().max().map_or(0, |m| m + 1);
    let mut internal = vec![0.0; community_count];
    let mut sigma = vec![0.0; community_count];

    for i in 0..level.node_count() {
        let ci = communities[i];
        sigma[ci] += k[i];
        internal[ci] += 2.0 * level.self_w[i];
        for &(j, w) in &level.adj[i] {
            if communities[j] == ci {
                internal[ci] += w;
            }
        }
    }

    (0..community_count)
        .map(|c| internal[c] / m2 - (sigma[c] / m2).powi(2))
        .sum()
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
    fn test_empty_graph() {
        let graph = undirected_paper_graph(&[], 0);
        let outcome = louvain(&graph, &LouvainConfig::default());
        assert!(outcome.communities.is_empty());
        assert_eq!(outcome.community_count, 0);
        assert!(outcome.converged);
    }

    #[test]
    fn test_community_ids_are_dense_from_zero() {
        let graph = undirected_paper_graph(&[(0, 1), (2, 3)], 5);
        let outcome = louvain(&graph, &LouvainConfig::default());

        let max = outcome.communities.iter().copied().max().unwrap();
        assert_eq!(outcome.community_count, max + 1);
        for c in 0..outcome.community_count {
            assert!(outcome.communities.contains(&c));
        }
        // First appearance order: node 0's community is 0
        assert_eq!(outcome.communities[0], 0);
    }

    #[test]
    fn test_isolated_node_keeps_its_own_community() {
        // Triangle 0-1-2 plus isolated 3
        let graph = undirected_paper_graph(&[(0, 1), (1, 2), (2, 0)], 4);
        let outcome = louvain(&graph, &LouvainConfig::default());

        assert_eq!(outcome.communities[0], outcome.communities[1]);
        assert_eq!(outcome.communities[1], outcome.communities[2]);
        assert_ne!(outcome.communities[3], outcome.communities[0]);
        assert_eq!(outcome.community_count, 2);
    }

    #[test]
    fn test_two_cliques_with_bridge() {
        let edges = [
            (0, 1), (1, 2), (2, 0), // clique A
            (3, 4), (4, 5), (5, 3), // clique B
            (2, 3), // bridge
        ];
        let graph = undirected_paper_graph(&edges, 6);
        let outcome = louvain(&graph, &LouvainConfig::default());

        assert_eq!(outcome.community_count, 2);
        assert_eq!(outcome.communities[0], outcome.communities[1]);
        assert_eq!(outcome.communities[1], outcome.communities[2]);
        assert_eq!(outcome.communities[3], outcome.communities[4]);
        assert_eq!(outcome.communities[4], outcome.communities[5]);
        assert_ne!(outcome.communities[0], outcome.communities[3]);
        assert!(outcome.modularity > 0.0);
        assert!(outcome.converged);
    }

    #[test]
    fn test_deterministic_reruns() {
        let edges = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (0, 3)];
        let graph = undirected_paper_graph(&edges, 6);

        let first = louvain(&graph, &LouvainConfig::default());
        let second = louvain(&graph, &LouvainConfig::default());
        assert_eq!(first.communities, second.communities);
        assert_eq!(first.modularity, second.modularity);
    }

    #[test]
    fn test_edgeless_graph_keeps_singletons() {
        let graph = undirected_paper_graph(&[], 3);
        let outcome = louvain(&graph, &LouvainConfig::default());
        assert_eq!(outcome.communities, vec![0, 1, 2]);
        assert_eq!(outcome.community_count, 3);
        assert_eq!(outcome.modularity, 0.0);
    }
}
