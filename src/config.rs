use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub node_env: String,

    // Xtream upstream
    pub xtream_timeout_ms: u64,
    pub accept_invalid_certs: bool,

    // Playlist
    pub playlist_max_age_secs: u64,

    // Misc
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            node_env: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),

            // Xtream upstream
            xtream_timeout_ms: env::var("XTREAM_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000), // 30 seconds

            // Many Xtream servers have self-signed certs
            accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),

            // Playlist
            playlist_max_age_secs: env::var("PLAYLIST_MAX_AGE_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600), // 1 hour

            // Misc - Use VLC user agent to avoid IPTV server blocks
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "VLC/3.0.20 LibVLC/3.0.20".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            node_env: "development".to_string(),
            xtream_timeout_ms: 30_000,
            accept_invalid_certs: true,
            playlist_max_age_secs: 3600,
            user_agent: "VLC/3.0.20 LibVLC/3.0.20".to_string(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
