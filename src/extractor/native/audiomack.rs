use crate::extractor::models::MediaInfo;
use crate::extractor::native::heuristics::{self, MetadataStrategy};
use crate::extractor::traits::Extractor;
use crate::utils::config::AppSettings;
use crate::utils::error::Result;
use crate::utils::http::{build_client, check_page_status};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const PLACEHOLDER_TITLE: &str = "Audiomack Track";

/// Scrapes track metadata out of an Audiomack page
///
/// Works on any HTML page that exposes JSON-LD, social meta tags or direct
/// audio links, so it doubles as the generic fallback extractor.
pub struct AudiomackExtractor {
    client: Client,
    timeout: Duration,
    strategies: Vec<Box<dyn MetadataStrategy>>,
}

impl AudiomackExtractor {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        Ok(Self::with_client(build_client()?, settings.page_timeout()))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            strategies: heuristics::default_chain(),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        check_page_status(response.status(), "track")?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Extractor for AudiomackExtractor {
    fn id(&self) -> &'static str {
        "audiomack"
    }

    fn supports(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .map(|host| host == "audiomack.com" || host.ends_with(".audiomack.com"))
            .unwrap_or(false)
    }

    async fn extract_info(&self, url: &str) -> Result<MediaInfo> {
        info!("Extracting page metadata for: {}", url);
        let page = self.fetch_page(url).await?;
        debug!("Fetched {} bytes of page text", page.len());

        let mut media = heuristics::run_chain(&page, &self.strategies);
        if media.title.is_none() {
            media.title = Some(title_from_url(url));
        }

        info!(
            "Extracted '{}' with {} format(s)",
            media.title.as_deref().unwrap_or_default(),
            media.formats.len()
        );
        Ok(media)
    }
}

/// Last non-empty path segment, or a placeholder
fn title_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path()
                .split('/')
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string)
        })
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}
