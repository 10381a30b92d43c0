use serde::{Deserialize, Serialize};

use crate::services::xtream::{XtreamCategory, XtreamServerInfo};

/// Body of POST /api/get-categories
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful response of POST /api/get-categories
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<XtreamCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_info: Option<XtreamServerInfo>,
}

/// Query of GET /api/serve-m3u (`url`, `u`, `p`, `cats`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeM3uQuery {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// URL-encoded JSON array of category ids
    pub cats: Option<String>,
}

impl ServeM3uQuery {
    /// Collect the known parameters. A repeated parameter keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "url" => &mut query.url,
                "u" => &mut query.username,
                "p" => &mut query.password,
                "cats" => &mut query.cats,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Returns the three values only when all are present and non-empty
pub fn required_credentials<'a>(
    url: Option<&'a str>,
    username: Option<&'a str>,
    password: Option<&'a str>,
) -> Option<(&'a str, &'a str, &'a str)> {
    match (url, username, password) {
        (Some(url), Some(username), Some(password))
            if !url.is_empty() && !username.is_empty() && !password.is_empty() =>
        {
            Some((url, username, password))
        }
        _ => None,
    }
}
