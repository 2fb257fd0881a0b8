use crate::extractor::models::{Format, MediaInfo};
use crate::utils::error::{GrabError, Result};
use async_trait::async_trait;

/// Core trait for all metadata extractors
///
/// Each implementation talks to one platform and returns the shared
/// [`MediaInfo`] shape, so callers can pick a format and hand its URL to the
/// download engine without knowing where it came from.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "audiomack", "spotify")
    fn id(&self) -> &'static str;

    /// Checks if this extractor can handle the given URL
    fn supports(&self, url: &str) -> bool;

    /// Extracts track information
    async fn extract_info(&self, url: &str) -> Result<MediaInfo>;

    /// Gets available formats (calls extract_info internally)
    async fn get_formats(&self, url: &str) -> Result<Vec<Format>> {
        let info = self.extract_info(url).await?;
        Ok(info.formats)
    }

    /// Resolves the direct download URL for a specific format
    async fn get_direct_url(&self, url: &str, format_id: &str) -> Result<String> {
        let info = self.extract_info(url).await?;
        info.format_url(format_id)
            .map(str::to_string)
            .ok_or_else(|| GrabError::FormatNotFound {
                format_id: format_id.to_string(),
                extractor: self.id(),
            })
    }
}
