//! Core-side Prometheus metrics.
//!
//! The server registers these into its registry via `all_metrics()`.

use once_cell::sync::Lazy;
use prometheus::{core::Collector, IntCounter, IntCounterVec, Opts};

/// Pipeline runs by terminal outcome.
pub static PIPELINE_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("grabdock_pipeline_runs_total", "Pipeline runs by outcome"),
        &["outcome"],
    )
    .unwrap()
});

/// Objects deleted by retention sweeps.
pub static SWEEP_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "grabdock_sweep_deleted_total",
        "Objects deleted by retention sweeps",
    )
    .unwrap()
});

/// Absorbed sweep failures (list or individual delete).
pub static SWEEP_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "grabdock_sweep_failures_total",
        "Absorbed retention sweep failures",
    )
    .unwrap()
});

/// All core metrics, for registration by the server.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(PIPELINE_RUNS_TOTAL.clone()),
        Box::new(SWEEP_DELETED_TOTAL.clone()),
        Box::new(SWEEP_FAILURES_TOTAL.clone()),
    ]
}
