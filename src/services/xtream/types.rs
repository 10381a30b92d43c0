//! Xtream Codes API Types
//!
//! Type definitions for the Xtream Codes Player API responses this service
//! consumes. Providers are inconsistent about numbers vs strings, so id and
//! counter fields accept both; structurally wrong values are rejected.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Provider credentials as supplied by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XtreamCredentials {
    /// Server base URL without trailing slash (e.g., "http://example.com:8080")
    pub server: String,
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
}

impl XtreamCredentials {
    /// Build credentials, stripping a single trailing slash from the server URL
    pub fn new(server: &str, username: &str, password: &str) -> Self {
        let server = server.strip_suffix('/').unwrap_or(server);

        Self {
            server: server.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Build the player_api.php endpoint (credentials go in the query string)
    pub fn api_endpoint(&self) -> String {
        format!("{}/player_api.php", self.server)
    }

    /// Build playback URL for live streams
    pub fn live_url(&self, stream_id: i64) -> String {
        format!(
            "{}/live/{}/{}/{}.ts",
            self.server, self.username, self.password, stream_id
        )
    }
}

// ============================================================================
// Authentication Response Types
// ============================================================================

/// Main authentication response from player_api.php (no action)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct XtreamAuthResponse {
    #[serde(default, deserialize_with = "deserialize_object_or_none")]
    pub user_info: Option<XtreamUserInfo>,
    #[serde(default, deserialize_with = "deserialize_object_or_none")]
    pub server_info: Option<XtreamServerInfo>,
}

impl XtreamAuthResponse {
    /// True only when the provider returned a user-info block with `auth == 1`
    pub fn is_authenticated(&self) -> bool {
        self.user_info
            .as_ref()
            .map(|info| info.auth == Some(1))
            .unwrap_or(false)
    }
}

/// User account fields used for the authentication decision and its log line
#[derive(Debug, Deserialize, Clone, Default)]
pub struct XtreamUserInfo {
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub auth: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub message: Option<String>,
}

/// Server information, passed through to clients as received
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct XtreamServerInfo {
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub https_port: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub server_protocol: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub rtmp_port: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_i64", skip_serializing_if = "Option::is_none")]
    pub timestamp_now: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_string", skip_serializing_if = "Option::is_none")]
    pub time_now: Option<String>,
    /// Provider-specific fields we do not model
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ============================================================================
// Category Types
// ============================================================================

/// Live stream category
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct XtreamCategory {
    #[serde(deserialize_with = "deserialize_id_string")]
    pub category_id: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub category_name: String,
    #[serde(default, deserialize_with = "deserialize_i64_or_zero")]
    pub parent_id: i64,
}

// ============================================================================
// Live Stream Types
// ============================================================================

/// Live stream (channel) information
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct XtreamLiveStream {
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub num: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub stream_type: Option<String>,
    #[serde(deserialize_with = "deserialize_required_i64")]
    pub stream_id: i64,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub stream_icon: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub epg_channel_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub added: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub custom_sid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub tv_archive: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub direct_source: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub tv_archive_duration: Option<i64>,
}

// ============================================================================
// Lenient field deserializers
// ============================================================================

fn value_to_opt_string<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected string or number, got {}", other))),
    }
}

fn value_to_opt_i64<E: de::Error>(value: Value) -> Result<Option<i64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| E::custom(format!("number out of range: {}", n))),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected numeric string, got {:?}", s)))
        }
        other => Err(E::custom(format!("expected number, got {}", other))),
    }
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    value_to_opt_string(Value::deserialize(deserializer)?)
}

fn deserialize_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt_string(deserializer)?.unwrap_or_default())
}

fn deserialize_id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_string(deserializer)?.ok_or_else(|| de::Error::custom("id must not be null"))
}

fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    value_to_opt_i64(Value::deserialize(deserializer)?)
}

fn deserialize_i64_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt_i64(deserializer)?.unwrap_or(0))
}

fn deserialize_required_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_i64(deserializer)?.ok_or_else(|| de::Error::custom("id must not be empty"))
}

/// Some providers send `[]` instead of an object for absent sections
fn deserialize_object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}
