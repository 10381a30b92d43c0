//! M3U playlist generation
//!
//! Fetches live categories and live streams from the provider, applies the
//! optional category selection and returns the playlist as a download.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::borrow::Cow;
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics;
use crate::models::{required_credentials, ServeM3uQuery};
use crate::routes::{record_outcome, upstream_error};
use crate::services::catalog::{build_playlist, CategoryFilter};
use crate::services::xtream::{XtreamClient, XtreamCredentials};
use crate::AppState;

const ENDPOINT: &str = "serve_m3u";

pub const M3U_CONTENT_TYPE: &str = "audio/x-mpegurl";

/// GET /api/serve-m3u?url=&u=&p=&cats=
///
/// The GET route also answers HEAD, which is refused here.
pub async fn serve_m3u(
    method: Method,
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, AppError> {
    if method == Method::HEAD {
        return Err(AppError::MethodNotAllowed);
    }

    let result = render_playlist(&state, query).await;
    record_outcome(ENDPOINT, &result);

    let body = result?;
    let filename = format!("xtream_playlist_{}.m3u", Utc::now().timestamp_millis());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, M3U_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", state.config.playlist_max_age_secs),
            ),
        ],
        body,
    )
        .into_response())
}

async fn render_playlist(
    state: &AppState,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<String, AppError> {
    let Query(pairs) = query.map_err(|_| AppError::MissingParameters)?;
    let query = ServeM3uQuery::from_pairs(pairs);

    let (url, username, password) = required_credentials(
        query.url.as_deref(),
        query.username.as_deref(),
        query.password.as_deref(),
    )
    .ok_or(AppError::MissingParameters)?;

    let server = decode_component(url);
    let filter = parse_filter(query.cats.as_deref());

    let client = XtreamClient::new(
        state.http.clone(),
        XtreamCredentials::new(&server, username, password),
    );

    // Independent upstream resources; the first failure cancels the other call
    let (categories, streams) = tokio::try_join!(
        async {
            client
                .get_live_categories()
                .await
                .map_err(|e| upstream_error(e, "Failed to fetch categories"))
        },
        async {
            client
                .get_live_streams()
                .await
                .map_err(|e| upstream_error(e, "Failed to fetch streams"))
        },
    )?;

    let playlist = build_playlist(client.credentials(), &categories, &streams, &filter);
    metrics::observe_playlist_channels(playlist.len());

    if playlist.is_empty() {
        tracing::warn!(
            server = %client.credentials().server,
            streams = streams.len(),
            filter = filter.len(),
            "Generated playlist has no channels"
        );
    } else {
        tracing::info!(
            server = %client.credentials().server,
            streams = streams.len(),
            channels = playlist.len(),
            filter = filter.len(),
            "Playlist generated"
        );
    }

    Ok(playlist.render())
}

/// Clients often encode values twice; decode once more, keeping the input on failure
fn decode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// A malformed selection disables filtering instead of failing the request
fn parse_filter(raw: Option<&str>) -> CategoryFilter {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return CategoryFilter::default();
    };

    match CategoryFilter::from_json(&decode_component(raw)) {
        Ok(filter) => filter,
        Err(e) => {
            tracing::warn!("Failed to parse categories, serving unfiltered playlist: {}", e);
            CategoryFilter::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_component() {
        assert_eq!(
            decode_component("http%3A%2F%2Fexample.com%3A8080"),
            "http://example.com:8080"
        );
        assert_eq!(decode_component("http://plain.com"), "http://plain.com");
    }

    #[test]
    fn test_parse_filter_variants() {
        assert!(!parse_filter(None).is_active());
        assert!(!parse_filter(Some("")).is_active());
        assert!(!parse_filter(Some("[")).is_active());
        assert!(!parse_filter(Some("\"7\"")).is_active());

        let filter = parse_filter(Some(r#"["1","2"]"#));
        assert_eq!(filter.len(), 2);

        let filter = parse_filter(Some("%5B%221%22%5D"));
        assert!(filter.allows(Some("1")));
        assert!(!filter.allows(Some("2")));
    }
}
