//! Temporal citation-candidate inference
//!
//! Bounded breadth-first expansion over the derived paper-to-paper edges
//! (SHARES_AUTHOR and RELATED_TO). A candidate neighborhood plus a strict
//! publication-year ordering yields a directed POTENTIALLY_CITES edge: a
//! heuristic asserting topical/authorial proximity and temporal
//! plausibility, not an actual citation.

use super::InferenceStats;
use crate::store::{
    ConnectOutcome, Direction, EntityLabel, GraphStore, NodeId, RelationType,
};
use citegraph_common::config::InferenceConfig;
use citegraph_common::metrics;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::info;

const EXPANSION_TYPES: [RelationType; 2] =
    [RelationType::SharesAuthor, RelationType::RelatedTo];

/// Infer POTENTIALLY_CITES edges between temporally ordered papers.
///
/// For each paper with a known publication year, expands up to
/// `config.citation_depth` hops over SHARES_AUTHOR/RELATED_TO and connects
/// `p1 -> p2` where `p1.published > p2.published` (strict). Papers without
/// a year are excluded from both sides. Re-running is idempotent since the
/// produced type does not accumulate.
pub fn infer_citation_candidates(
    store: &mut GraphStore,
    config: &InferenceConfig,
) -> InferenceStats {
    let start = Instant::now();
    let mut stats = InferenceStats::new("citation_candidates");

    let papers: Vec<(NodeId, i64)> = store
        .nodes_with_label(EntityLabel::Paper)
        .filter_map(|n| {
            n.attributes
                .get(&config.published_attribute)
                .and_then(|v| v.as_int())
                .map(|year| (n.id, year))
        })
        .collect();

    for &(p1, year1) in &papers {
        let candidates = expand(store, p1, config.citation_depth);

        for p2 in candidates {
            let node = store.node(p2);
            if node.label != EntityLabel::Paper {
                continue;
            }
            let year2 = match node.attributes.get(&config.published_attribute) {
                Some(v) => match v.as_int() {
                    Some(y) => y,
                    None => continue,
                },
                None => continue,
            };

            stats.pairs_examined += 1;
            if year1 > year2 {
                let outcome = store.connect(p1, p2, RelationType::PotentiallyCites, 1.0);
                if outcome == ConnectOutcome::Created {
                    stats.edges_created += 1;
                }
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    metrics::record_inference(
        "citation_candidates",
        stats.edges_touched() as u64,
        start.elapsed().as_secs_f64(),
    );
    info!(
        rule = stats.rule.as_str(),
        papers = papers.len(),
        pairs = stats.pairs_examined,
        created = stats.edges_created,
        "Inference pass complete"
    );

    stats
}

/// Breadth-first expansion from `start` to `max_depth` hops, excluding the
/// start node itself
fn expand(store: &GraphStore, start: NodeId, max_depth: usize) -> Vec<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::from([start]);
    let mut reached = Vec::new();
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::from([(start, 0)]);

    while let Some((current, depth)) = queue.pop_front() {
        if depth == max_depth {
            continue;
        }
        for (neighbor, _) in store.edges_matching(current, &EXPANSION_TYPES, Direction::Outgoing) {
            if visited.insert(neighbor) {
                reached.push(neighbor);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AttrValue, Attributes};

    fn paper_with_year(store: &mut GraphStore, key: &str, year: Option<i64>) -> NodeId {
        let mut attrs = Attributes::new();
        if let Some(y) = year {
            attrs.insert("published".to_string(), AttrValue::Int(y));
        }
        store
            .upsert_entity(EntityLabel::Paper, key, attrs)
            .unwrap()
    }

    fn link(store: &mut GraphStore, a: NodeId, b: NodeId) {
        store.connect(a, b, RelationType::SharesAuthor, 1.0);
        store.connect(b, a, RelationType::SharesAuthor, 1.0);
    }

    #[test]
    fn test_strictly_newer_cites_older() {
        let mut store = GraphStore::new();
        let newer = paper_with_year(&mut store, "newer", Some(2021));
        let older = paper_with_year(&mut store, "older", Some(2015));
        link(&mut store, newer, older);

        let stats = infer_citation_candidates(&mut store, &InferenceConfig::default());

        assert_eq!(stats.edges_created, 1);
        assert_eq!(
            store.edges_of(newer, Some(RelationType::PotentiallyCites), Direction::Outgoing),
            vec![(older, 1.0)]
        );
        // Never the reverse
        assert!(store
            .edges_of(older, Some(RelationType::PotentiallyCites), Direction::Outgoing)
            .is_empty());
    }

    #[test]
    fn test_equal_years_do_not_link() {
        let mut store = GraphStore::new();
        let p1 = paper_with_year(&mut store, "p1", Some(2020));
        let p2 = paper_with_year(&mut store, "p2", Some(2020));
        link(&mut store, p1, p2);

        let stats = infer_citation_candidates(&mut store, &InferenceConfig::default());
        assert_eq!(stats.edges_created, 0);
    }

    #[test]
    fn test_unknown_year_excluded_from_both_sides() {
        let mut store = GraphStore::new();
        let dated = paper_with_year(&mut store, "dated", Some(2021));
        let undated = paper_with_year(&mut store, "undated", None);
        link(&mut store, dated, undated);

        let stats = infer_citation_candidates(&mut store, &InferenceConfig::default());

        assert_eq!(stats.edges_created, 0);
        assert!(store
            .edges_of(dated, Some(RelationType::PotentiallyCites), Direction::Outgoing)
            .is_empty());
        assert!(store
            .edges_of(undated, Some(RelationType::PotentiallyCites), Direction::Outgoing)
            .is_empty());
    }

    #[test]
    fn test_expansion_is_depth_bounded() {
        let mut store = GraphStore::new();
        // Chain p0 - p1 - p2 - p3, strictly decreasing years
        let p: Vec<NodeId> = (0..4)
            .map(|i| paper_with_year(&mut store, &format!("p{}", i), Some(2020 - i as i64)))
            .collect();
        for w in p.windows(2) {
            link(&mut store, w[0], w[1]);
        }

        infer_citation_candidates(&mut store, &InferenceConfig::default());

        // Depth 2 reaches p1 and p2 from p0, never p3
        let targets: Vec<NodeId> = store
            .edges_of(p[0], Some(RelationType::PotentiallyCites), Direction::Outgoing)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert!(targets.contains(&p[1]));
        assert!(targets.contains(&p[2]));
        assert!(!targets.contains(&p[3]));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut store = GraphStore::new();
        let newer = paper_with_year(&mut store, "newer", Some(2021));
        let older = paper_with_year(&mut store, "older", Some(2015));
        link(&mut store, newer, older);

        infer_citation_candidates(&mut store, &InferenceConfig::default());
        let stats = infer_citation_candidates(&mut store, &InferenceConfig::default());

        assert_eq!(stats.edges_created, 0);
        assert_eq!(
            store.edges_of(newer, Some(RelationType::PotentiallyCites), Direction::Outgoing),
            vec![(older, 1.0)]
        );
    }
}
