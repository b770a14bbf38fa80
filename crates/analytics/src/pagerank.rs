//! PageRank centrality
//!
//! Power iteration over the projected graph with uniform dangling-mass
//! redistribution, so scores always sum to 1 regardless of sinks. Sweeps
//! write into a generation buffer and swap, never mutating in place.

use crate::ScoredNode;
use citegraph_common::config::PageRankSettings;
use citegraph_common::metrics;
use citegraph_graph::ProjectedGraph;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// PageRank configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Damping factor (typically 0.85)
    pub damping: f64,

    /// Maximum iterations
    pub max_iterations: usize,

    /// L1 score-delta convergence threshold
    pub epsilon: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 20,
            epsilon: 1e-6,
        }
    }
}

impl From<&PageRankSettings> for PageRankConfig {
    fn from(settings: &PageRankSettings) -> Self {
        Self {
            damping: settings.damping,
            max_iterations: settings.max_iterations,
            epsilon: settings.epsilon,
        }
    }
}

/// PageRank result
///
/// `converged = false` means the iteration cap fired before the delta
/// threshold; the scores are still returned, flagged as approximate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRankOutcome {
    /// Score per projected index; non-negative, sums to 1
    pub scores: Vec<f64>,

    /// Iterations performed
    pub iterations: usize,

    /// Whether the delta threshold was reached
    pub converged: bool,
}

impl PageRankOutcome {
    /// Scores joined back to store handles, sorted descending
    pub fn ranked(&self, graph: &ProjectedGraph) -> Vec<ScoredNode> {
        let mut nodes: Vec<ScoredNode> = self
            .scores
            .iter()
            .enumerate()
            .map(|(index, &score)| ScoredNode {
                index,
                node: graph.handle(index),
                score,
            })
            .collect();

        nodes.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        nodes
    }
}

/// Compute PageRank scores over a projected graph.
///
/// Uniform initial score `1/n`; each iteration distributes damped mass
/// proportionally to edge weights, dangling nodes spread theirs over all
/// nodes. Deterministic for a given projection.
pub fn pagerank(graph: &ProjectedGraph, config: &PageRankConfig) -> PageRankOutcome {
    let start = Instant::now();
    let n = graph.node_count();

    if n == 0 {
        return PageRankOutcome {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let n_f = n as f64;
    let damping = config.damping;
    let teleport = (1.0 - damping) / n_f;

    // Out-weight totals; zero marks a dangling node
    let out_weight: Vec<f64> = (0..n)
        .map(|u| graph.neighbors(u).iter().map(|(_, w)| w).sum())
        .collect();

    let mut scores = vec![1.0 / n_f; n];
    let mut next = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iterations {
        iterations += 1;

        for s in next.iter_mut() {
            *s = teleport;
        }

        for u in 0..n {
            if out_weight[u] == 0.0 {
                // Dangling: redistribute uniformly to conserve total mass
                let share = damping * scores[u] / n_f;
                for s in next.iter_mut() {
                    *s += share;
                }
            } else {
                let mass = damping * scores[u] / out_weight[u];
                for &(v, w) in graph.neighbors(u) {
                    next[v] += mass * w;
                }
            }
        }

        let delta: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        std::mem::swap(&mut scores, &mut next);

        if delta < config.epsilon {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            iterations,
            epsilon = config.epsilon,
            "PageRank hit the iteration cap before converging; result is approximate"
        );
    }
    debug!(nodes = n, iterations, converged, "PageRank complete");
    metrics::record_algorithm("pagerank", start.elapsed().as_secs_f64(), converged);

    PageRankOutcome {
        scores,
        iterations,
        converged,
    }
}
