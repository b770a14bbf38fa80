//! Relationship storage
//!
//! Directed, typed edges with dual adjacency (outgoing and incoming, the
//! mirror kept in lockstep). Connect semantics depend on the relationship
//! type: accumulating types add weight on repeat, all others are
//! strictly idempotent.

use super::{Direction, NodeId, RelationType};
use tracing::debug;

/// One stored edge, seen from one endpoint
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    /// The other endpoint
    pub neighbor: NodeId,

    /// Relationship type
    pub rel_type: RelationType,

    /// Accumulated weight (unset for unweighted types)
    pub weight: Option<f64>,

    /// Ordinal property (e.g. author position on WROTE edges)
    pub order: Option<i64>,
}

/// Outcome of a connect call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new edge was created
    Created,
    /// An accumulating edge existed; its weight grew
    Reinforced,
    /// An idempotent edge existed; nothing changed
    Unchanged,
    /// Source equals target; rejected silently
    SelfLoop,
}

impl ConnectOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectOutcome::Created => "created",
            ConnectOutcome::Reinforced => "reinforced",
            ConnectOutcome::Unchanged => "unchanged",
            ConnectOutcome::SelfLoop => "self_loop",
        }
    }
}

/// Dual-adjacency edge store
#[derive(Debug, Default)]
pub struct RelationshipStore {
    /// Per-source adjacency
    outgoing: Vec<Vec<EdgeRecord>>,

    /// Per-target mirror
    incoming: Vec<Vec<EdgeRecord>>,

    /// Distinct `(source, target, type)` triples
    edge_count: usize,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow adjacency to cover a freshly minted node handle
    pub(crate) fn ensure_node(&mut self, id: NodeId) {
        let needed = id.index() + 1;
        if self.outgoing.len() < needed {
            self.outgoing.resize_with(needed, Vec::new);
            self.incoming.resize_with(needed, Vec::new);
        }
    }

    /// Create or reinforce the edge `source -> target` of `rel_type`.
    ///
    /// At most one edge exists per ordered `(source, target, type)` triple.
    /// Accumulating types add `initial_weight` on repeat; idempotent types
    /// no-op. Self-loops are rejected silently since inference rules would
    /// otherwise produce them.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: RelationType,
        initial_weight: f64,
    ) -> ConnectOutcome {
        if source == target {
            debug!(node = source.index(), rel = rel_type.as_str(), "Self-loop rejected");
            return ConnectOutcome::SelfLoop;
        }

        self.ensure_node(source);
        self.ensure_node(target);

        let existing = self.outgoing[source.index()]
            .iter_mut()
            .find(|e| e.neighbor == target && e.rel_type == rel_type);

        if let Some(out_edge) = existing {
            if !rel_type.accumulates() {
                return ConnectOutcome::Unchanged;
            }

            let new_weight = out_edge.weight.unwrap_or(0.0) + initial_weight;
            out_edge.weight = Some(new_weight);

            // Keep the mirror in lockstep
            if let Some(in_edge) = self.incoming[target.index()]
                .iter_mut()
                .find(|e| e.neighbor == source && e.rel_type == rel_type)
            {
                in_edge.weight = Some(new_weight);
            }

            return ConnectOutcome::Reinforced;
        }

        let weight = rel_type.accumulates().then_some(initial_weight);
        self.outgoing[source.index()].push(EdgeRecord {
            neighbor: target,
            rel_type,
            weight,
            order: None,
        });
        self.incoming[target.index()].push(EdgeRecord {
            neighbor: source,
            rel_type,
            weight,
            order: None,
        });
        self.edge_count += 1;

        ConnectOutcome::Created
    }

    /// Connect with an ordinal property, set on creation only
    pub fn connect_with_order(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: RelationType,
        order: i64,
    ) -> ConnectOutcome {
        let outcome = self.connect(source, target, rel_type, 1.0);
        if outcome == ConnectOutcome::Created {
            if let Some(edge) = self.outgoing[source.index()]
                .iter_mut()
                .find(|e| e.neighbor == target && e.rel_type == rel_type)
            {
                edge.order = Some(order);
            }
            if let Some(edge) = self.incoming[target.index()]
                .iter_mut()
                .find(|e| e.neighbor == source && e.rel_type == rel_type)
            {
                edge.order = Some(order);
            }
        }
        outcome
    }

    /// Neighbors of `id` along `rel_type` (or every type), with weights.
    ///
    /// Unweighted edges report weight 1.0.
    pub fn edges_of(
        &self,
        id: NodeId,
        rel_type: Option<RelationType>,
        direction: Direction,
    ) -> Vec<(NodeId, f64)> {
        self.records(id, direction)
            .iter()
            .filter(|e| rel_type.map_or(true, |t| e.rel_type == t))
            .map(|e| (e.neighbor, e.weight.unwrap_or(1.0)))
            .collect()
    }

    /// Neighbors of `id` along any of `rel_types`
    pub fn edges_matching(
        &self,
        id: NodeId,
        rel_types: &[RelationType],
        direction: Direction,
    ) -> Vec<(NodeId, f64)> {
        self.records(id, direction)
            .iter()
            .filter(|e| rel_types.contains(&e.rel_type))
            .map(|e| (e.neighbor, e.weight.unwrap_or(1.0)))
            .collect()
    }

    /// Raw edge records for one endpoint
    pub fn records(&self, id: NodeId, direction: Direction) -> &[EdgeRecord] {
        let side = match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        side.get(id.index()).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Degree of `id` along `rel_type`
    pub fn degree(&self, id: NodeId, rel_type: RelationType, direction: Direction) -> usize {
        self.records(id, direction)
            .iter()
            .filter(|e| e.rel_type == rel_type)
            .count()
    }

    /// Distinct `(source, target, type)` triples stored
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn test_accumulating_weight_never_duplicates() {
        let mut store = RelationshipStore::new();

        assert_eq!(
            store.connect(id(0), id(1), RelationType::SharesAuthor, 1.0),
            ConnectOutcome::Created
        );
        assert_eq!(
            store.connect(id(0), id(1), RelationType::SharesAuthor, 1.0),
            ConnectOutcome::Reinforced
        );
        assert_eq!(
            store.connect(id(0), id(1), RelationType::SharesAuthor, 1.0),
            ConnectOutcome::Reinforced
        );

        let edges = store.edges_of(id(0), Some(RelationType::SharesAuthor), Direction::Outgoing);
        assert_eq!(edges, vec![(id(1), 3.0)]);
        assert_eq!(store.edge_count(), 1);

        // Mirror carries the same accumulated weight
        let mirror = store.edges_of(id(1), Some(RelationType::SharesAuthor), Direction::Incoming);
        assert_eq!(mirror, vec![(id(0), 3.0)]);
    }

    #[test]
    fn test_idempotent_types_no_op_on_repeat() {
        let mut store = RelationshipStore::new();

        assert_eq!(
            store.connect(id(0), id(1), RelationType::Wrote, 1.0),
            ConnectOutcome::Created
        );
        assert_eq!(
            store.connect(id(0), id(1), RelationType::Wrote, 1.0),
            ConnectOutcome::Unchanged
        );

        assert_eq!(store.edge_count(), 1);
        let edges = store.edges_of(id(0), Some(RelationType::Wrote), Direction::Outgoing);
        assert_eq!(edges, vec![(id(1), 1.0)]);
    }

    #[test]
    fn test_self_loop_rejected_silently() {
        let mut store = RelationshipStore::new();

        assert_eq!(
            store.connect(id(2), id(2), RelationType::SharesAuthor, 1.0),
            ConnectOutcome::SelfLoop
        );
        assert_eq!(store.edge_count(), 0);
        assert!(store.edges_of(id(2), None, Direction::Outgoing).is_empty());
    }

    #[test]
    fn test_same_endpoints_different_types_coexist() {
        let mut store = RelationshipStore::new();

        store.connect(id(0), id(1), RelationType::SharesAuthor, 1.0);
        store.connect(id(0), id(1), RelationType::RelatedTo, 1.0);

        assert_eq!(store.edge_count(), 2);
        assert_eq!(
            store.edges_of(id(0), None, Direction::Outgoing).len(),
            2
        );
        assert_eq!(
            store
                .edges_matching(id(0), &[RelationType::SharesAuthor, RelationType::RelatedTo], Direction::Outgoing)
                .len(),
            2
        );
    }

    #[test]
    fn test_order_set_on_create_only() {
        let mut store = RelationshipStore::new();

        store.connect_with_order(id(0), id(1), RelationType::Wrote, 1);
        store.connect_with_order(id(0), id(1), RelationType::Wrote, 7);

        let records = store.records(id(0), Direction::Outgoing);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order, Some(1));
    }

    #[test]
    fn test_degree() {
        let mut store = RelationshipStore::new();

        store.connect(id(0), id(1), RelationType::Wrote, 1.0);
        store.connect(id(0), id(2), RelationType::Wrote, 1.0);
        store.connect(id(0), id(3), RelationType::HasKeyword, 1.0);

        assert_eq!(store.degree(id(0), RelationType::Wrote, Direction::Outgoing), 2);
        assert_eq!(store.degree(id(1), RelationType::Wrote, Direction::Incoming), 1);
        assert_eq!(store.degree(id(0), RelationType::Wrote, Direction::Incoming), 0);
    }
}
