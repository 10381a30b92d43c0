//! Live category listing
//!
//! Authenticates against the provider, then returns its live categories with
//! unnamed entries removed and the rest sorted by name.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{required_credentials, CategoriesRequest, CategoriesResponse};
use crate::routes::{record_outcome, upstream_error};
use crate::services::catalog::visible_categories;
use crate::services::xtream::{XtreamClient, XtreamCredentials, XtreamError};
use crate::AppState;

const ENDPOINT: &str = "get_categories";

/// POST /api/get-categories
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CategoriesRequest>, JsonRejection>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let result = load_categories(&state, payload).await;
    record_outcome(ENDPOINT, &result);
    result.map(Json)
}

async fn load_categories(
    state: &AppState,
    payload: Result<Json<CategoriesRequest>, JsonRejection>,
) -> Result<CategoriesResponse, AppError> {
    // An unreadable body carries no parameters either
    let Json(payload) = payload.map_err(|_| AppError::MissingParameters)?;

    let (url, username, password) = required_credentials(
        payload.url.as_deref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    )
    .ok_or(AppError::MissingParameters)?;

    let client = XtreamClient::new(
        state.http.clone(),
        XtreamCredentials::new(url, username, password),
    );

    let auth = client.get_auth().await.map_err(|e| match e {
        // HTML login pages and other non-JSON answers mean bad credentials
        XtreamError::Parse(_) => {
            tracing::warn!("Xtream auth response was not valid JSON: {}", e);
            AppError::AuthenticationFailed
        }
        other => upstream_error(other, "Failed to authenticate with Xtream server"),
    })?;

    if !auth.is_authenticated() {
        let user = auth.user_info.as_ref();
        tracing::warn!(
            server = %client.credentials().server,
            status = ?user.and_then(|u| u.status.as_deref()),
            message = ?user.and_then(|u| u.message.as_deref()),
            "Xtream authentication rejected"
        );
        return Err(AppError::AuthenticationFailed);
    }

    let categories = client
        .get_live_categories()
        .await
        .map_err(|e| upstream_error(e, "Failed to fetch categories"))?;

    let total = categories.len();
    let categories = visible_categories(categories);

    tracing::info!(
        server = %client.credentials().server,
        total,
        visible = categories.len(),
        "Live categories fetched"
    );

    Ok(CategoriesResponse {
        success: true,
        categories,
        server_info: auth.server_info,
    })
}
