//! Metrics and observability utilities
//!
//! Counters and histograms for sync runs. Recording is a no-op until a
//! recorder is installed.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all WFSync metrics
pub const METRICS_PREFIX: &str = "wfsync";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_entities_total", METRICS_PREFIX),
        Unit::Count,
        "Entities processed, labelled by category and outcome"
    );

    describe_histogram!(
        format!("{}_fetch_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Remote fetch latency in seconds"
    );

    describe_counter!(
        format!("{}_category_runs_total", METRICS_PREFIX),
        Unit::Count,
        "Category runs, labelled by final state"
    );

    tracing::debug!("Metrics registered");
}

/// Helper to time one remote call
pub struct FetchTimer {
    start: Instant,
    endpoint: &'static str,
}

impl FetchTimer {
    /// Start timing a call to `endpoint` (listing or detail)
    pub fn start(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Record completion
    pub fn finish(self, success: bool) {
        let status = if success { "success" } else { "error" };
        histogram!(
            format!("{}_fetch_duration_seconds", METRICS_PREFIX),
            "endpoint" => self.endpoint,
            "status" => status
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

/// Count one entity outcome (`persisted`, `failed`)
pub fn record_entity(category: &str, outcome: &'static str) {
    counter!(
        format!("{}_entities_total", METRICS_PREFIX),
        "category" => category.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count a finished category run
pub fn record_category_run(category: &str, state: &'static str) {
    counter!(
        format!("{}_category_runs_total", METRICS_PREFIX),
        "category" => category.to_string(),
        "state" => state
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        register_metrics();
        let timer = FetchTimer::start("detail");
        timer.finish(true);
        record_entity("mod", "persisted");
        record_category_run("mod", "done");
    }
}
