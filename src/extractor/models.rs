//! Data structures for track information

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Normalized metadata for a track, album or playlist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub uploader: Option<String>,
    /// Length in whole seconds
    #[serde(default)]
    pub duration: Option<u64>,
    /// Discovery order, unique by non-null `url`
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// A single playable (or withheld) stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    pub ext: String,
    /// `None` when the vendor withholds playback for this item
    pub url: Option<String>,
}

impl Format {
    pub fn new(format_id: impl Into<String>, ext: impl Into<String>, url: Option<String>) -> Self {
        Self {
            format_id: format_id.into(),
            ext: ext.into(),
            url,
        }
    }
}

impl MediaInfo {
    /// Drop formats whose URL was already seen. Entries without a URL are kept.
    pub fn dedup_formats(&mut self) {
        let mut seen = HashSet::new();
        self.formats.retain(|f| match &f.url {
            Some(url) => seen.insert(url.clone()),
            None => true,
        });
    }

    /// First format carrying a direct URL
    pub fn best_audio_url(&self) -> Option<&str> {
        self.formats.iter().find_map(|f| f.url.as_deref())
    }

    /// Format with the given id, if it has a URL
    pub fn format_url(&self, format_id: &str) -> Option<&str> {
        self.formats
            .iter()
            .filter(|f| f.format_id == format_id)
            .find_map(|f| f.url.as_deref())
    }

    pub fn is_playable(&self) -> bool {
        self.best_audio_url().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(id: &str, url: Option<&str>) -> Format {
        Format::new(id, "mp3", url.map(str::to_string))
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut info = MediaInfo {
            formats: vec![
                fmt("audio", Some("https://cdn.test/a.mp3")),
                fmt("mp3", Some("https://cdn.test/b.mp3")),
                fmt("mp3", Some("https://cdn.test/a.mp3")),
            ],
            ..Default::default()
        };
        info.dedup_formats();
        let ids: Vec<_> = info.formats.iter().map(|f| f.format_id.as_str()).collect();
        assert_eq!(ids, vec!["audio", "mp3"]);
    }

    #[test]
    fn test_dedup_keeps_withheld_entries() {
        let mut info = MediaInfo {
            formats: vec![fmt("t1", None), fmt("t2", None), fmt("t3", Some("https://p/x"))],
            ..Default::default()
        };
        info.dedup_formats();
        assert_eq!(info.formats.len(), 3);
    }

    #[test]
    fn test_best_audio_url_skips_withheld() {
        let info = MediaInfo {
            formats: vec![fmt("t1", None), fmt("t2", Some("https://p/2"))],
            ..Default::default()
        };
        assert_eq!(info.best_audio_url(), Some("https://p/2"));
        assert!(info.is_playable());
        assert_eq!(info.format_url("t2"), Some("https://p/2"));
        assert_eq!(info.format_url("t1"), None);
    }

    #[test]
    fn test_empty_record_not_playable() {
        assert!(!MediaInfo::default().is_playable());
    }
}
