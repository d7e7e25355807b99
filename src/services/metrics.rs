use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    pub static ref REQUESTS_COUNTER: CounterVec = register_counter_vec!(
        "api_announcement_requests_total",
        "Announcement requests by operation and HTTP status",
        &["operation", "status"]
    ).unwrap();
}

/// Count one handled request.
pub fn record(operation: &str, status: axum::http::StatusCode) {
    REQUESTS_COUNTER
        .with_label_values(&[operation, status.as_str()])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_record_increments_labelled_counter() {
        let before = REQUESTS_COUNTER
            .with_label_values(&["metrics-test", "418"])
            .get();
        record("metrics-test", StatusCode::IM_A_TEAPOT);
        record("metrics-test", StatusCode::IM_A_TEAPOT);
        let after = REQUESTS_COUNTER
            .with_label_values(&["metrics-test", "418"])
            .get();
        assert_eq!(after - before, 2.0);
    }
}
