use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static CRUD_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "delivery_hub_crud_operations_total",
        "Completed CRUD operations by resource and operation",
        &["resource", "op"]
    )
    .expect("register crud_operations_total")
});

pub static EMAIL_NOTIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "delivery_hub_email_notifications_total",
        "Email notifications by outcome",
        &["outcome"]
    )
    .expect("register email_notifications_total")
});

pub fn record_crud(resource: &str, op: &str) {
    CRUD_OPERATIONS_TOTAL.with_label_values(&[resource, op]).inc();
}

pub fn record_email(outcome: &str) {
    EMAIL_NOTIFICATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Text exposition of the default registry.
pub fn encode_metrics() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
