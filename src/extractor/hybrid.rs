use crate::extractor::models::{Format, MediaInfo};
use crate::extractor::native::{AudiomackExtractor, SpotifyExtractor};
use crate::extractor::traits::Extractor;
use crate::utils::config::AppSettings;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::debug;

/// The Hybrid Extractor Registry
///
/// Holds the available extractors and routes each URL to the first one whose
/// `supports(url)` matches, or to the fallback. Failures are returned as-is;
/// nothing is retried.
pub struct HybridExtractor {
    extractors: Vec<Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
}

impl HybridExtractor {
    /// Create a new HybridExtractor with the given registry and fallback
    pub fn new(extractors: Vec<Arc<dyn Extractor>>, fallback: Arc<dyn Extractor>) -> Self {
        Self {
            extractors,
            fallback,
        }
    }

    /// Spotify for Spotify URLs, page scraping for everything else
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let spotify: Arc<dyn Extractor> = Arc::new(SpotifyExtractor::new(settings)?);
        let page: Arc<dyn Extractor> = Arc::new(AudiomackExtractor::new(settings)?);
        Ok(Self::new(vec![spotify, page.clone()], page))
    }

    /// Find the best extractor for a given URL
    pub fn find_extractor(&self, url: &str) -> &Arc<dyn Extractor> {
        for extractor in &self.extractors {
            if extractor.supports(url) {
                debug!("Routing to extractor: {}", extractor.id());
                return extractor;
            }
        }
        debug!("Routing to fallback extractor: {}", self.fallback.id());
        &self.fallback
    }

    pub async fn extract_info(&self, url: &str) -> Result<MediaInfo> {
        self.find_extractor(url).extract_info(url).await
    }

    pub async fn get_formats(&self, url: &str) -> Result<Vec<Format>> {
        self.find_extractor(url).get_formats(url).await
    }

    pub async fn get_direct_url(&self, url: &str, format_id: &str) -> Result<String> {
        self.find_extractor(url).get_direct_url(url, format_id).await
    }
}
