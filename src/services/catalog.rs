//! Category ordering, category filtering and playlist assembly
//!
//! Pure transformations over the records returned by the Xtream API. Nothing
//! here performs I/O.

use icu_collator::{Collator, CollatorOptions};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::services::m3u_writer::{M3uWriter, PlaylistEntry};
use crate::services::xtream::{XtreamCategory, XtreamCredentials, XtreamLiveStream};

/// Group title for streams whose category id is not in the category list
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ============================================================================
// Category list
// ============================================================================

/// Root-locale collator with default strength: punctuation sorts before
/// digits and letters, Latin before other scripts, lowercase before uppercase.
fn name_collator() -> Option<Collator> {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("Collator unavailable, sorting categories by code point: {:?}", e);
            None
        }
    }
}

fn compare_names(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    collator
        .map(|c| c.compare(a, b))
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.cmp(b))
}

/// Drop unnamed categories and sort the rest by name
pub fn visible_categories(categories: Vec<XtreamCategory>) -> Vec<XtreamCategory> {
    let mut visible: Vec<XtreamCategory> = categories
        .into_iter()
        .filter(|c| !c.category_name.trim().is_empty())
        .collect();

    let collator = name_collator();
    visible.sort_by(|a, b| compare_names(collator.as_ref(), &a.category_name, &b.category_name));
    visible
}

/// category_id -> category_name
pub fn category_names(categories: &[XtreamCategory]) -> HashMap<String, String> {
    categories
        .iter()
        .map(|c| (c.category_id.clone(), c.category_name.clone()))
        .collect()
}

// ============================================================================
// Category filter
// ============================================================================

/// Client-selected category ids. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    ids: HashSet<String>,
}

impl CategoryFilter {
    /// Parse a JSON array of category ids. Numbers are accepted as ids.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let values: Vec<Value> =
            serde_json::from_str(raw).map_err(|e| format!("not a JSON array: {}", e))?;

        let ids = values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(format!("unexpected category id: {}", other)),
            })
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self { ids })
    }

    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether a stream with this category id passes the filter
    pub fn allows(&self, category_id: Option<&str>) -> bool {
        if !self.is_active() {
            return true;
        }
        category_id.map(|id| self.ids.contains(id)).unwrap_or(false)
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Playlist assembly
// ============================================================================

/// Join streams with category names, apply the filter and build the playlist.
/// Provider order is preserved.
pub fn build_playlist(
    creds: &XtreamCredentials,
    categories: &[XtreamCategory],
    streams: &[XtreamLiveStream],
    filter: &CategoryFilter,
) -> M3uWriter {
    let names = category_names(categories);
    let mut writer = M3uWriter::with_capacity(streams.len());

    for stream in streams
        .iter()
        .filter(|s| filter.allows(s.category_id.as_deref()))
    {
        let display_name = if stream.name.is_empty() {
            format!("Channel {}", stream.stream_id)
        } else {
            stream.name.clone()
        };

        let group = stream
            .category_id
            .as_ref()
            .and_then(|id| names.get(id))
            .filter(|name| !name.is_empty())
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATEGORY);

        writer.push(PlaylistEntry::new(
            stream.epg_channel_id.as_deref().unwrap_or_default(),
            &display_name,
            stream.stream_icon.as_deref().unwrap_or_default(),
            group,
            &creds.live_url(stream.stream_id),
        ));
    }

    writer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> XtreamCategory {
        XtreamCategory {
            category_id: id.to_string(),
            category_name: name.to_string(),
            parent_id: 0,
        }
    }

    fn stream(id: i64, name: &str, category_id: Option<&str>) -> XtreamLiveStream {
        XtreamLiveStream {
            num: None,
            name: name.to_string(),
            stream_type: Some("live".to_string()),
            stream_id: id,
            stream_icon: None,
            epg_channel_id: None,
            added: None,
            category_id: category_id.map(str::to_string),
            custom_sid: None,
            tv_archive: None,
            direct_source: None,
            tv_archive_duration: None,
        }
    }

    fn creds() -> XtreamCredentials {
        XtreamCredentials::new("http://example.com:8080/", "user", "pass")
    }

    #[test]
    fn test_visible_categories_filters_and_sorts() {
        let input = vec![
            category("1", "sports"),
            category("2", "   "),
            category("3", "Élite"),
            category("4", ""),
            category("5", "News"),
            category("6", "Ecole"),
        ];

        let names: Vec<String> = visible_categories(input)
            .into_iter()
            .map(|c| c.category_name)
            .collect();

        assert_eq!(names, vec!["Ecole", "Élite", "News", "sports"]);
    }

    fn sorted_names(names: &[&str]) -> Vec<String> {
        let input = names
            .iter()
            .enumerate()
            .map(|(i, name)| category(&i.to_string(), name))
            .collect();

        visible_categories(input)
            .into_iter()
            .map(|c| c.category_name)
            .collect()
    }

    #[test]
    fn test_sort_is_case_insensitive_first() {
        assert_eq!(
            sorted_names(&["Zebra", "Banana", "apple", "zebra"]),
            vec!["apple", "Banana", "zebra", "Zebra"]
        );
    }

    #[test]
    fn test_sort_orders_punctuation_and_scripts() {
        assert_eq!(
            sorted_names(&["Zebra", "zebra", "Sports", "Новости", "News", "~Misc", "Apple"]),
            vec!["~Misc", "Apple", "News", "Sports", "zebra", "Zebra", "Новости"]
        );
        assert_eq!(
            sorted_names(&["أخبار", "Кино", "Movies", "24/7", "|VIP|"]),
            vec!["|VIP|", "24/7", "Movies", "Кино", "أخبار"]
        );
    }

    #[test]
    fn test_compare_names_without_collator_uses_code_points() {
        assert_eq!(compare_names(None, "B", "a"), Ordering::Less);
        assert_eq!(compare_names(None, "a", "a"), Ordering::Equal);
    }

    #[test]
    fn test_category_filter_from_json() {
        let filter = CategoryFilter::from_json(r#"["1", "7", 9]"#).unwrap();
        assert!(filter.is_active());
        assert_eq!(filter.len(), 3);
        assert!(filter.allows(Some("9")));
        assert!(!filter.allows(Some("2")));
        assert!(!filter.allows(None));

        assert!(CategoryFilter::from_json("not json").is_err());
        assert!(CategoryFilter::from_json(r#"{"a": 1}"#).is_err());
        assert!(CategoryFilter::from_json(r#"[["nested"]]"#).is_err());
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let filter = CategoryFilter::from_json("[]").unwrap();
        assert!(!filter.is_active());
        assert!(filter.allows(None));
        assert!(filter.allows(Some("anything")));
    }

    #[test]
    fn test_build_playlist_without_filter_keeps_order() {
        let categories = vec![category("1", "News"), category("2", "Sports")];
        let streams = vec![
            stream(3, "C", Some("2")),
            stream(1, "A", Some("1")),
            stream(2, "B", Some("2")),
        ];

        let doc = build_playlist(&creds(), &categories, &streams, &CategoryFilter::default())
            .render();
        let urls: Vec<&str> = doc.lines().filter(|l| l.starts_with("http")).collect();

        assert_eq!(
            urls,
            vec![
                "http://example.com:8080/live/user/pass/3.ts",
                "http://example.com:8080/live/user/pass/1.ts",
                "http://example.com:8080/live/user/pass/2.ts",
            ]
        );
    }

    #[test]
    fn test_build_playlist_with_filter() {
        let categories = vec![category("1", "News"), category("2", "Sports")];
        let streams = vec![
            stream(1, "A", Some("1")),
            stream(2, "B", Some("2")),
            stream(3, "C", None),
            stream(4, "D", Some("1")),
        ];
        let filter: CategoryFilter = ["1"].into_iter().collect();

        let writer = build_playlist(&creds(), &categories, &streams, &filter);
        let doc = writer.render();

        assert_eq!(writer.len(), 2);
        assert!(doc.contains(r#"group-title="News",A"#));
        assert!(doc.contains(r#"group-title="News",D"#));
        assert!(!doc.contains(",B\n"));
        assert!(doc.find(",A\n").unwrap() < doc.find(",D\n").unwrap());
    }

    #[test]
    fn test_unnamed_stream_without_category() {
        let streams = vec![stream(42, "", Some("7"))];

        let doc = build_playlist(&creds(), &[], &streams, &CategoryFilter::default()).render();

        assert_eq!(
            doc,
            "#EXTM3U\n\
             #EXTINF:-1 tvg-id=\"\" tvg-name=\"Channel 42\" tvg-logo=\"\" group-title=\"Unknown\",Channel 42\n\
             http://example.com:8080/live/user/pass/42.ts\n"
        );
    }

    #[test]
    fn test_names_are_sanitized_in_output() {
        let categories = vec![category("1", "News,\nWorld")];
        let streams = vec![stream(1, "CNN, \r\nInternational", Some("1"))];

        let doc = build_playlist(&creds(), &categories, &streams, &CategoryFilter::default())
            .render();
        let extinf = doc.lines().nth(1).unwrap();

        assert!(extinf.contains(r#"tvg-name="CNN    International""#));
        assert!(extinf.contains(r#"group-title="News  World""#));
        assert_eq!(extinf.matches(',').count(), 1);
    }

    #[test]
    fn test_logo_and_epg_id_are_written() {
        let mut s = stream(5, "BBC", Some("1"));
        s.stream_icon = Some("http://logo/bbc.png".to_string());
        s.epg_channel_id = Some("bbc.uk".to_string());

        let doc = build_playlist(&creds(), &[category("1", "UK")], &[s], &CategoryFilter::default())
            .render();

        assert!(doc.contains(r#"tvg-id="bbc.uk" tvg-name="BBC" tvg-logo="http://logo/bbc.png" group-title="UK",BBC"#));
    }
}
