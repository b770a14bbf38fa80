//! Relationship inference
//!
//! Derives new relationship types from existing ones:
//! - Shared-author links between papers (SHARES_AUTHOR)
//! - Shared-keyword links between papers (RELATED_TO)
//! - Collaboration links between authors (COLLABORATED)
//! - Temporal citation candidates via bounded expansion (POTENTIALLY_CITES)
//!
//! Every rule is order-independent and convergent within a pass, and each
//! elementary connect is idempotent-or-accumulate, so a failed rule is
//! recovered by re-running that rule alone. Accumulating weights are
//! cumulative evidence: run each rule exactly once per build phase.

mod cooccurrence;
mod temporal;

pub use cooccurrence::{infer_collaborations, infer_shared_authors, infer_shared_keywords};
pub use temporal::infer_citation_candidates;

use serde::{Deserialize, Serialize};

/// Summary of one inference rule pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceStats {
    /// Rule name
    pub rule: String,

    /// Candidate pairs examined
    pub pairs_examined: usize,

    /// Edges newly created
    pub edges_created: usize,

    /// Existing edges whose weight grew
    pub edges_reinforced: usize,

    /// Pass duration in milliseconds
    pub duration_ms: u64,
}

impl InferenceStats {
    fn new(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            pairs_examined: 0,
            edges_created: 0,
            edges_reinforced: 0,
            duration_ms: 0,
        }
    }

    /// Edges touched by the pass
    pub fn edges_touched(&self) -> usize {
        self.edges_created + self.edges_reinforced
    }
}
