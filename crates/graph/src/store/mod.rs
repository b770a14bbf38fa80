//! Heterogeneous graph storage
//!
//! Provides the persistent half of the engine:
//! - Entity Store: deduplicated typed nodes keyed by natural identifiers
//! - Relationship Store: directed typed edges with weight accumulation
//! - `GraphStore`: the combined ingestion and query facade

mod entity;
mod graph;
mod relationship;

pub use entity::{EntityStore, Node};
pub use graph::GraphStore;
pub use relationship::{ConnectOutcome, EdgeRecord, RelationshipStore};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entity label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Author,
    Paper,
    Journal,
    Keyword,
    Researcher,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Author => "author",
            EntityLabel::Paper => "paper",
            EntityLabel::Journal => "journal",
            EntityLabel::Keyword => "keyword",
            EntityLabel::Researcher => "researcher",
        }
    }
}

/// Relationship type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Wrote,
    PublishedIn,
    HasKeyword,
    SharesAuthor,
    RelatedTo,
    PotentiallyCites,
    Collaborated,
}

impl RelationType {
    /// Whether repeated connects accumulate weight instead of no-op'ing.
    ///
    /// Accumulating types model evidence strengthening: every repeated
    /// observation of the relationship adds to its weight. All other types
    /// are strictly idempotent.
    pub fn accumulates(&self) -> bool {
        matches!(
            self,
            RelationType::SharesAuthor | RelationType::RelatedTo | RelationType::Collaborated
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Wrote => "WROTE",
            RelationType::PublishedIn => "PUBLISHED_IN",
            RelationType::HasKeyword => "HAS_KEYWORD",
            RelationType::SharesAuthor => "SHARES_AUTHOR",
            RelationType::RelatedTo => "RELATED_TO",
            RelationType::PotentiallyCites => "POTENTIALLY_CITES",
            RelationType::Collaborated => "COLLABORATED",
        }
    }
}

/// Direction for edge queries and traversals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Edges where the queried node is the source
    Outgoing,
    /// Edges where the queried node is the target
    Incoming,
}

/// Scalar attribute value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Integer view, used for publication years
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

/// Attribute mapping attached to every node
pub type Attributes = HashMap<String, AttrValue>;

/// Opaque node handle
///
/// Minted only by the store (dense arena index). The store has no deletion
/// API, so a handle stays valid for the lifetime of the store that issued it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    /// Arena index backing this handle
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
