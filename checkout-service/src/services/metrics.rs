//! Prometheus metrics for checkout-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Completed return redirects by outcome class.
pub static CHECKOUT_OUTCOMES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "checkout_outcomes_total",
        "Total checkout return redirects by outcome",
        &["outcome"] // success, cancelled, payment_incomplete, error, unknown_redirect
    )
    .expect("Failed to register checkout_outcomes_total")
});

/// Store writes that failed and were absorbed by the workflow.
pub static STORE_WRITE_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "checkout_store_write_failures_total",
        "Total absorbed store write failures by write kind",
        &["write"] // order, order_items, party_session, group_order_summary
    )
    .expect("Failed to register checkout_store_write_failures_total")
});

/// Metadata fields the decoder had to default.
pub static DECODE_DEFAULTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "checkout_decode_defaults_total",
        "Total metadata fields replaced by their default during decoding",
        &["field"]
    )
    .expect("Failed to register checkout_decode_defaults_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "checkout_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register checkout_db_query_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&CHECKOUT_OUTCOMES_TOTAL);
    Lazy::force(&STORE_WRITE_FAILURES_TOTAL);
    Lazy::force(&DECODE_DEFAULTS_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

/// Record a completed return redirect.
pub fn record_outcome(outcome: &str) {
    CHECKOUT_OUTCOMES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record an absorbed store write failure.
pub fn record_store_write_failure(write: &str) {
    STORE_WRITE_FAILURES_TOTAL.with_label_values(&[write]).inc();
}

/// Record a defaulted metadata field.
pub fn record_decode_default(field: &str) {
    DECODE_DEFAULTS_TOTAL.with_label_values(&[field]).inc();
}
