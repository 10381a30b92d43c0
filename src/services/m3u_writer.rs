//! Extended M3U serialization
//!
//! Renders `#EXTM3U` followed by one `#EXTINF` line and one URL line per
//! channel. Names are sanitized so they cannot break the attribute list or
//! the line structure.

use lazy_static::lazy_static;
use regex::Regex;

pub const M3U_HEADER: &str = "#EXTM3U";

lazy_static! {
    static ref UNSAFE_FIELD_CHARS: Regex = Regex::new(r"[,\r\n]").unwrap();
}

/// Replace each comma, CR and LF with a space, then trim
pub fn sanitize_field(value: &str) -> String {
    UNSAFE_FIELD_CHARS.replace_all(value, " ").trim().to_string()
}

/// One channel in the playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub tvg_id: String,
    pub name: String,
    pub logo: String,
    pub group: String,
    pub url: String,
}

impl PlaylistEntry {
    /// Build an entry, sanitizing the display name and group title
    pub fn new(tvg_id: &str, name: &str, logo: &str, group: &str, url: &str) -> Self {
        Self {
            tvg_id: tvg_id.to_string(),
            name: sanitize_field(name),
            logo: logo.to_string(),
            group: sanitize_field(group),
            url: url.to_string(),
        }
    }

    pub fn extinf_line(&self) -> String {
        format!(
            r#"#EXTINF:-1 tvg-id="{}" tvg-name="{}" tvg-logo="{}" group-title="{}",{}"#,
            self.tvg_id, self.name, self.logo, self.group, self.name
        )
    }
}

/// Accumulates entries and renders the final document
#[derive(Debug, Default)]
pub struct M3uWriter {
    entries: Vec<PlaylistEntry>,
}

impl M3uWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: PlaylistEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(16 + self.entries.len() * 256);
        out.push_str(M3U_HEADER);
        out.push('\n');

        for entry in &self.entries {
            out.push_str(&entry.extinf_line());
            out.push('\n');
            out.push_str(&entry.url);
            out.push('\n');
        }

        out
    }
}
