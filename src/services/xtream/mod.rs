//! Xtream Codes Integration
//!
//! Thin client for the Xtream Codes Player API v2.
//!
//! # Endpoints used
//!
//! ```text
//! GET <server>/player_api.php?username=X&password=Y                            auth + server info
//! GET <server>/player_api.php?username=X&password=Y&action=get_live_categories
//! GET <server>/player_api.php?username=X&password=Y&action=get_live_streams
//! ```
//!
//! Live playback URLs follow `<server>/live/<username>/<password>/<stream_id>.ts`.

pub mod client;
pub mod types;

// Re-exports for convenience
pub use client::{build_http_client, XtreamClient, XtreamError};
pub use types::{XtreamCategory, XtreamCredentials, XtreamLiveStream, XtreamServerInfo};
