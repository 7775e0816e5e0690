//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Download requests (outcomes, durations)
//! - Metadata lookups (retries)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Finished requests by outcome.
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tunefetch_requests_total", "Total download requests finished"),
        &["outcome"], // "succeeded", "failed", "invalid", "busy"
    )
    .unwrap()
});

/// Whole-pipeline duration in seconds.
pub static PIPELINE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tunefetch_pipeline_duration_seconds",
            "Duration of a download request from classification to terminal state",
        )
        .buckets(vec![1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["outcome"],
    )
    .unwrap()
});

/// 1 while a request is in flight.
pub static REQUEST_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("tunefetch_request_active", "Whether a download request is running").unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// Retries performed by the retry wrapper.
pub static RETRIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("tunefetch_retries_total", "Total retried operation attempts").unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(REQUESTS_TOTAL.clone()),
        Box::new(PIPELINE_DURATION.clone()),
        Box::new(REQUEST_ACTIVE.clone()),
        Box::new(RETRIES_TOTAL.clone()),
    ]
}
