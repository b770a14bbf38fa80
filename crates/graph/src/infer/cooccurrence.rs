//! Co-occurrence inference rules
//!
//! All three rules share one shape: pick a hub entity, collect the members
//! incident to it, and reinforce a pairwise link between every pair of
//! distinct members, in both directions (undirected semantics realized as
//! two directed edges). Sparse fan-out keeps this quadratic only per hub.

use super::InferenceStats;
use crate::store::{ConnectOutcome, Direction, EntityLabel, GraphStore, NodeId, RelationType};
use citegraph_common::metrics;
use std::time::Instant;
use tracing::info;

/// Link papers that share an author with SHARES_AUTHOR edges.
///
/// For every pair of distinct papers co-authored by the same author, weight
/// +1 in both directions per author linking them.
pub fn infer_shared_authors(store: &mut GraphStore) -> InferenceStats {
    cooccurrence_pass(
        store,
        "shared_authors",
        EntityLabel::Author,
        RelationType::Wrote,
        Direction::Outgoing,
        RelationType::SharesAuthor,
    )
}

/// Link papers that share a keyword with RELATED_TO edges.
pub fn infer_shared_keywords(store: &mut GraphStore) -> InferenceStats {
    cooccurrence_pass(
        store,
        "shared_keywords",
        EntityLabel::Keyword,
        RelationType::HasKeyword,
        Direction::Incoming,
        RelationType::RelatedTo,
    )
}

/// Link authors that co-wrote a paper with COLLABORATED edges.
///
/// The hub is the paper; weight grows by one per co-authored paper.
pub fn infer_collaborations(store: &mut GraphStore) -> InferenceStats {
    cooccurrence_pass(
        store,
        "collaborations",
        EntityLabel::Paper,
        RelationType::Wrote,
        Direction::Incoming,
        RelationType::Collaborated,
    )
}

fn cooccurrence_pass(
    store: &mut GraphStore,
    rule: &str,
    hub_label: EntityLabel,
    scan_type: RelationType,
    scan_direction: Direction,
    produced: RelationType,
) -> InferenceStats {
    let start = Instant::now();
    let mut stats = InferenceStats::new(rule);

    let hubs: Vec<NodeId> = store.nodes_with_label(hub_label).map(|n| n.id).collect();

    for hub in hubs {
        let members: Vec<NodeId> = store
            .edges_of(hub, Some(scan_type), scan_direction)
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                stats.pairs_examined += 1;
                record(&mut stats, store.connect(members[i], members[j], produced, 1.0));
                record(&mut stats, store.connect(members[j], members[i], produced, 1.0));
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    metrics::record_inference(rule, stats.edges_touched() as u64, start.elapsed().as_secs_f64());
    info!(
        rule,
        pairs = stats.pairs_examined,
        created = stats.edges_created,
        reinforced = stats.edges_reinforced,
        "Inference pass complete"
    );

    stats
}

fn record(stats: &mut InferenceStats, outcome: ConnectOutcome) {
    match outcome {
        ConnectOutcome::Created => stats.edges_created += 1,
        ConnectOutcome::Reinforced => stats.edges_reinforced += 1,
        ConnectOutcome::Unchanged | ConnectOutcome::SelfLoop => {}
    }
}
