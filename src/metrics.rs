//! Prometheus metrics registered on the default registry and exposed by
//! `GET /metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Histogram, IntCounterVec,
};

lazy_static! {
    static ref UPSTREAM_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "xtream_upstream_requests_total",
        "Requests made to Xtream provider APIs",
        &["action", "outcome"]
    )
    .expect("Failed to register upstream requests metric");

    static ref ENDPOINT_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "playlist_requests_total",
        "Requests handled by the category and playlist endpoints",
        &["endpoint", "outcome"]
    )
    .expect("Failed to register endpoint requests metric");

    static ref PLAYLIST_CHANNELS: Histogram = register_histogram!(
        "playlist_channels",
        "Channels written per generated playlist",
        vec![0.0, 10.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0, 50000.0]
    )
    .expect("Failed to register playlist channels metric");
}

/// Count one upstream call. `action` is empty for the authentication call.
pub fn record_upstream(action: &str, outcome: &str) {
    let action = if action.is_empty() { "auth" } else { action };
    UPSTREAM_REQUESTS.with_label_values(&[action, outcome]).inc();
}

pub fn record_endpoint(endpoint: &str, outcome: &str) {
    ENDPOINT_REQUESTS.with_label_values(&[endpoint, outcome]).inc();
}

pub fn observe_playlist_channels(count: usize) {
    PLAYLIST_CHANNELS.observe(count as f64);
}
