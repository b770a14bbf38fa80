//! CiteGraph property graph core
//!
//! The heterogeneous in-memory graph this engine is built around:
//! - Typed, deduplicated entity storage with upsert-by-key semantics
//! - Directed, typed, weighted relationship storage with
//!   idempotent-or-accumulate connect semantics
//! - Relationship inference (co-authorship, shared keywords,
//!   collaborations, temporal citation candidates)
//! - Projection into a homogeneous weighted graph for analytics

pub mod infer;
pub mod projection;
pub mod store;

pub use projection::{project, Orientation, ProjectedGraph, ProjectionSpec};
pub use store::{
    AttrValue, Attributes, ConnectOutcome, Direction, EntityLabel, GraphStore, Node, NodeId,
    RelationType,
};
