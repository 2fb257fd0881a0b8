//! Page metadata heuristics
//!
//! Each strategy inspects raw page text and returns a partial [`MediaInfo`].
//! [`run_chain`] applies them in order of decreasing reliability: JSON-LD,
//! then social meta tags, then a raw scan for audio links and a duration
//! fragment. Scalar fields keep the first value found; formats accumulate in
//! discovery order and are deduplicated by URL at the end.

use crate::extractor::models::{Format, MediaInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

static JSON_LD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script[^>]+type=["']application/ld\+json["'][^>]*>(.*?)</script>"#).unwrap()
});

static AUDIO_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[\w\-/._?=&%]+\.(?:mp3|m3u8)(?:\?[^"'>\s]+)?"#).unwrap()
});

/// Matches `"duration": "PT3M27S"`, hours included (`PT1H2M3S`)
static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""duration"\s*:\s*"PT?(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?""#).unwrap()
});

static OG_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| meta_regex("og:title"));
static OG_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| meta_regex("og:image"));
static AUTHOR_REGEX: Lazy<Regex> = Lazy::new(|| meta_regex("author"));

fn meta_regex(key: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)<meta\s+(?:property|name)\s*=\s*["']{}["']\s+content\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        regex::escape(key)
    ))
    .unwrap()
}

/// A single metadata heuristic
pub trait MetadataStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns whatever this heuristic can find. Never fails.
    fn extract(&self, page: &str) -> MediaInfo;
}

/// Embedded `application/ld+json` block
pub struct StructuredDataStrategy;

/// `og:title`, `og:image` and `author` meta tags
pub struct MetaTagStrategy;

/// Every `.mp3` / `.m3u8` URL in the page text
pub struct DirectLinkStrategy;

/// ISO-8601-like `"duration":"PT..."` fragment
pub struct DurationStrategy;

impl MetadataStrategy for StructuredDataStrategy {
    fn name(&self) -> &'static str {
        "json-ld"
    }

    fn extract(&self, page: &str) -> MediaInfo {
        let mut info = MediaInfo::default();
        let Some(doc) = find_json_ld(page) else {
            return info;
        };

        info.title = non_empty_str(doc.get("name")).or_else(|| non_empty_str(doc.get("headline")));
        info.thumbnail = doc.get("image").and_then(image_url);
        info.uploader = doc.get("author").and_then(|author| match author {
            Value::Object(_) => non_empty_str(author.get("name")),
            Value::String(_) => non_empty_str(Some(author)),
            _ => None,
        });

        if let Some(audio) = doc.get("audio").filter(|a| a.is_object()) {
            let content = non_empty_str(audio.get("contentUrl")).or_else(|| non_empty_str(audio.get("url")));
            if let Some(url) = content {
                let ext = if url.to_lowercase().ends_with(".mp3") {
                    "mp3".to_string()
                } else {
                    infer_ext(&url)
                };
                info.formats.push(Format::new("audio", ext, Some(url)));
            }
        }

        info
    }
}

impl MetadataStrategy for MetaTagStrategy {
    fn name(&self) -> &'static str {
        "meta-tags"
    }

    fn extract(&self, page: &str) -> MediaInfo {
        MediaInfo {
            title: meta_content(&OG_TITLE_REGEX, page),
            thumbnail: meta_content(&OG_IMAGE_REGEX, page),
            uploader: meta_content(&AUTHOR_REGEX, page),
            ..Default::default()
        }
    }
}

impl MetadataStrategy for DirectLinkStrategy {
    fn name(&self) -> &'static str {
        "direct-links"
    }

    fn extract(&self, page: &str) -> MediaInfo {
        let formats = find_direct_audio_urls(page)
            .into_iter()
            .map(|url| {
                let lower = url.to_lowercase();
                let ext = if lower.ends_with(".mp3") {
                    "mp3".to_string()
                } else if lower.contains(".m3u8") {
                    "m3u8".to_string()
                } else {
                    infer_ext(&url)
                };
                Format::new(ext.clone(), ext, Some(url))
            })
            .collect();

        MediaInfo {
            formats,
            ..Default::default()
        }
    }
}

impl MetadataStrategy for DurationStrategy {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn extract(&self, page: &str) -> MediaInfo {
        MediaInfo {
            duration: parse_duration(page),
            ..Default::default()
        }
    }
}

/// The heuristics in priority order
pub fn default_chain() -> Vec<Box<dyn MetadataStrategy>> {
    vec![
        Box::new(StructuredDataStrategy),
        Box::new(MetaTagStrategy),
        Box::new(DirectLinkStrategy),
        Box::new(DurationStrategy),
    ]
}

/// Run every strategy over `page` and merge the results.
///
/// Formats without a URL are dropped, and only the first format per URL is kept.
pub fn run_chain(page: &str, strategies: &[Box<dyn MetadataStrategy>]) -> MediaInfo {
    let mut merged = MediaInfo::default();
    for strategy in strategies {
        let partial = strategy.extract(page);
        debug!(
            "Strategy {} found title={} thumbnail={} uploader={} duration={:?} formats={}",
            strategy.name(),
            partial.title.is_some(),
            partial.thumbnail.is_some(),
            partial.uploader.is_some(),
            partial.duration,
            partial.formats.len()
        );
        merge(&mut merged, partial);
    }

    merged.formats.retain(|f| f.url.is_some());
    merged.dedup_formats();
    merged
}

fn merge(into: &mut MediaInfo, partial: MediaInfo) {
    if into.title.is_none() {
        into.title = partial.title;
    }
    if into.thumbnail.is_none() {
        into.thumbnail = partial.thumbnail;
    }
    if into.uploader.is_none() {
        into.uploader = partial.uploader;
    }
    if into.duration.is_none() {
        into.duration = partial.duration;
    }
    into.formats.extend(partial.formats);
}

/// First JSON-LD block, parsed. A malformed block counts as absent.
fn find_json_ld(page: &str) -> Option<Value> {
    let body = JSON_LD_REGEX.captures(page)?.get(1)?.as_str().trim();
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items.into_iter().find(Value::is_object),
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring malformed JSON-LD block: {}", e);
            None
        }
    }
}

fn image_url(image: &Value) -> Option<String> {
    match image {
        Value::Array(items) => items.first().and_then(image_url),
        Value::Object(_) => non_empty_str(image.get("url")),
        other => non_empty_str(Some(other)),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn meta_content(regex: &Regex, page: &str) -> Option<String> {
    let caps = regex.captures(page)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let decoded = decode_entities(raw.trim());
    (!decoded.is_empty()).then_some(decoded)
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// All `.mp3` / `.m3u8` links, first-seen order, no repeats
pub fn find_direct_audio_urls(page: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    AUDIO_LINK_REGEX
        .find_iter(page)
        .map(|m| m.as_str().to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Total seconds of the first `"duration":"PT..."` fragment
pub fn parse_duration(page: &str) -> Option<u64> {
    let caps = DURATION_REGEX.captures(page)?;
    if (1..=3).all(|i| caps.get(i).is_none()) {
        return None;
    }
    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    Some(
        part(1)
            .saturating_mul(3600)
            .saturating_add(part(2).saturating_mul(60))
            .saturating_add(part(3)),
    )
}

/// Lowercased extension of the URL's last path segment, query and fragment ignored
pub fn infer_ext(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => "unknown".to_string(),
    }
}
