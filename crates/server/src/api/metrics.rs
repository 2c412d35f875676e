//! Prometheus metrics recording.

use metrics::{counter, gauge, histogram};
use std::time::Duration;
use vectradb_core::storage::Database;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a write operation metric.
pub fn record_write_operation(entity: &str, operation: &str) {
    counter!(
        "vectradb_operations_total",
        "entity" => entity.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Records a search operation metric.
pub fn record_search_operation(search_type: &str) {
    counter!("vectradb_search_total", "type" => search_type.to_string()).increment(1);
}

/// Updates the `vectradb_vectors_total` gauge.
pub fn update_vector_metrics(db: &Database) {
    gauge!("vectradb_vectors_total").set(db.vectors().len() as f64);
    gauge!("vectradb_metadata_keys_total").set(db.vectors().metadata_key_count() as f64);
}
