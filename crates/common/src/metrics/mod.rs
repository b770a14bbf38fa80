//! Metrics and observability utilities
//!
//! Provides engine metrics on the `metrics` facade with standardized
//! naming conventions. Exporter installation (e.g. Prometheus) is the
//! host process's responsibility.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics prefix for all CiteGraph metrics
pub const METRICS_PREFIX: &str = "citegraph";

/// Register all metric descriptions
pub fn register_metrics() {
    // Ingestion metrics
    describe_counter!(
        format!("{}_entities_upserted_total", METRICS_PREFIX),
        Unit::Count,
        "Total entity upserts, by label and outcome (created/existing)"
    );

    describe_counter!(
        format!("{}_edges_connected_total", METRICS_PREFIX),
        Unit::Count,
        "Total edge connects, by relationship type and outcome"
    );

    describe_counter!(
        format!("{}_self_loops_rejected_total", METRICS_PREFIX),
        Unit::Count,
        "Edges silently rejected because source equals target"
    );

    // Inference metrics
    describe_counter!(
        format!("{}_inferred_edges_total", METRICS_PREFIX),
        Unit::Count,
        "Derived edges created or reinforced, by inference rule"
    );

    describe_histogram!(
        format!("{}_inference_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Inference rule pass duration in seconds"
    );

    // Projection metrics
    describe_histogram!(
        format!("{}_projection_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Graph projection duration in seconds"
    );

    // Algorithm metrics
    describe_histogram!(
        format!("{}_algorithm_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Analytics algorithm duration in seconds, by algorithm"
    );

    describe_counter!(
        format!("{}_algorithm_nonconvergence_total", METRICS_PREFIX),
        Unit::Count,
        "Algorithm runs that hit the iteration cap before the threshold"
    );

    tracing::info!("Metrics registered");
}

/// Record an entity upsert
pub fn record_entity_upsert(label: &str, created: bool) {
    let outcome = if created { "created" } else { "existing" };

    counter!(
        format!("{}_entities_upserted_total", METRICS_PREFIX),
        "label" => label.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record an edge connect
pub fn record_edge_connect(rel_type: &str, outcome: &str) {
    counter!(
        format!("{}_edges_connected_total", METRICS_PREFIX),
        "type" => rel_type.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a silently rejected self-loop
pub fn record_self_loop_rejected(rel_type: &str) {
    counter!(
        format!("{}_self_loops_rejected_total", METRICS_PREFIX),
        "type" => rel_type.to_string()
    )
    .increment(1);
}

/// Record an inference rule pass
pub fn record_inference(rule: &str, edges: u64, duration_secs: f64) {
    counter!(
        format!("{}_inferred_edges_total", METRICS_PREFIX),
        "rule" => rule.to_string()
    )
    .increment(edges);

    histogram!(
        format!("{}_inference_duration_seconds", METRICS_PREFIX),
        "rule" => rule.to_string()
    )
    .record(duration_secs);
}

/// Record a projection build
pub fn record_projection(duration_secs: f64) {
    histogram!(format!("{}_projection_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Record an analytics algorithm run
pub fn record_algorithm(algorithm: &str, duration_secs: f64, converged: bool) {
    histogram!(
        format!("{}_algorithm_duration_seconds", METRICS_PREFIX),
        "algorithm" => algorithm.to_string()
    )
    .record(duration_secs);

    if !converged {
        counter!(
            format!("{}_algorithm_nonconvergence_total", METRICS_PREFIX),
            "algorithm" => algorithm.to_string()
        )
        .increment(1);
    }
}
