pub mod categories;
pub mod health;
pub mod playlist;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::metrics;
use crate::services::xtream::XtreamError;
use crate::AppState;

/// Build the application router with its middleware stack
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/ready", get(health::ready))
        .route("/live", get(health::live))
        // Xtream adapter endpoints
        .route(
            "/api/get-categories",
            post(categories::get_categories).fallback(method_not_allowed),
        )
        .route(
            "/api/serve-m3u",
            get(playlist::serve_m3u).fallback(method_not_allowed),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Map a client failure to the handler error, keeping the detail in the logs only
pub(crate) fn upstream_error(err: XtreamError, message: &str) -> AppError {
    tracing::warn!("{}: {}", message, err);
    if err.is_transport() {
        AppError::UpstreamUnavailable(message.to_string())
    } else {
        AppError::InvalidUpstreamResponse(format!("{}: invalid response from Xtream server", message))
    }
}

pub(crate) fn record_outcome<T>(endpoint: &str, result: &Result<T, AppError>) {
    match result {
        Ok(_) => metrics::record_endpoint(endpoint, "ok"),
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(endpoint, "Request failed: {}", e);
            } else {
                tracing::warn!(endpoint, "Request rejected: {}", e);
            }
            metrics::record_endpoint(endpoint, e.kind());
        }
    }
}
