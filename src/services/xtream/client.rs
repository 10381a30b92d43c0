//! Xtream Codes API Client
//!
//! HTTP client for the Player API calls this service needs: the
//! authentication check, live categories and live streams.

use super::types::*;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Config;
use crate::metrics;

/// Build the shared HTTP client used for every upstream call
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_millis(config.xtream_timeout_ms))
        .user_agent(&config.user_agent)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
}

/// Xtream API Client
///
/// Cheap to construct: it holds a clone of the pooled `reqwest::Client` and the
/// credentials for one request.
pub struct XtreamClient {
    http: Client,
    creds: XtreamCredentials,
}

impl XtreamClient {
    pub fn new(http: Client, creds: XtreamCredentials) -> Self {
        Self { http, creds }
    }

    pub fn credentials(&self) -> &XtreamCredentials {
        &self.creds
    }

    /// GET player_api.php with an optional action, returning the raw body
    async fn fetch(&self, action: &str) -> Result<String, XtreamError> {
        let mut query = vec![
            ("username", self.creds.username.as_str()),
            ("password", self.creds.password.as_str()),
        ];
        if !action.is_empty() {
            query.push(("action", action));
        }

        debug!(action = %action, server = %self.creds.server, "Xtream API request");

        let response = self
            .http
            .get(self.creds.api_endpoint())
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream(action, "network_error");
                if e.is_timeout() {
                    XtreamError::Timeout
                } else {
                    // Without the URL: it carries the credentials
                    XtreamError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_upstream(action, "http_error");
            return Err(XtreamError::Http(status.as_u16()));
        }

        let text = response.text().await.map_err(|e| {
            metrics::record_upstream(action, "network_error");
            XtreamError::Network(e.without_url().to_string())
        })?;

        metrics::record_upstream(action, "ok");
        Ok(text)
    }

    fn parse<T: DeserializeOwned>(action: &str, text: &str) -> Result<T, XtreamError> {
        serde_json::from_str(text).map_err(|e| {
            error!(
                "Failed to parse Xtream response for action '{}': {}",
                action, e
            );
            debug!("Response text: {}", truncate(text, 500));
            XtreamError::Parse(e.to_string())
        })
    }

    /// List endpoints answer `null` or nothing at all when there is no data
    async fn get_list<T: DeserializeOwned>(&self, action: &str) -> Result<Vec<T>, XtreamError> {
        let text = self.fetch(action).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Vec::new());
        }
        Self::parse(action, trimmed)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Get authentication info (user_info + server_info)
    pub async fn get_auth(&self) -> Result<XtreamAuthResponse, XtreamError> {
        let text = self.fetch("").await?;
        Self::parse("", &text)
    }

    // ========================================================================
    // Live TV
    // ========================================================================

    /// Get live stream categories
    pub async fn get_live_categories(&self) -> Result<Vec<XtreamCategory>, XtreamError> {
        self.get_list("get_live_categories").await
    }

    /// Get all live streams
    pub async fn get_live_streams(&self) -> Result<Vec<XtreamLiveStream>, XtreamError> {
        self.get_list("get_live_streams").await
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Xtream API Error types
#[derive(Debug, Error)]
pub enum XtreamError {
    /// Network/connection error
    #[error("Network error: {0}")]
    Network(String),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP error (non-2xx status)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// JSON parsing error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl XtreamError {
    /// True when the HTTP exchange itself failed (as opposed to a bad body)
    pub fn is_transport(&self) -> bool {
        !matches!(self, XtreamError::Parse(_))
    }
}
