//! audiograb library
//!
//! Resolves track metadata and direct audio URLs from Audiomack pages and the
//! Spotify Web API, and streams a resolved URL to disk with progress events.

pub mod downloader;
pub mod extractor;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{DownloadConfig, DownloadEngine, DownloadProgress, DownloadStatus};
pub use extractor::{
    AudiomackExtractor, Extractor, Format, HybridExtractor, MediaInfo, SpotifyExtractor,
};
pub use utils::{AppSettings, GrabError, SpotifySettings};
