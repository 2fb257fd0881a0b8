//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
pub const SPOTIFY_OEMBED_URL: &str = "https://open.spotify.com/oembed";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Download location
    pub download_location: PathBuf,

    /// Chunk size for streaming (bytes)
    pub chunk_size: usize,

    /// Timeout for fetching a track page (seconds)
    pub page_timeout_secs: u64,

    /// Timeout for vendor API calls (seconds)
    pub api_timeout_secs: u64,

    /// Default timeout for media downloads (seconds)
    pub download_timeout_secs: u64,

    #[serde(default)]
    pub spotify: SpotifySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_location: dirs::download_dir().unwrap_or_else(|| PathBuf::from("./downloads")),
            chunk_size: 8192, // 8KB
            page_timeout_secs: 15,
            api_timeout_secs: 10,
            download_timeout_secs: 15,
            spotify: SpotifySettings::default(),
        }
    }
}

impl AppSettings {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Credentials and endpoints for the Spotify Web API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Pre-provisioned OAuth token, used as-is when present
    pub bearer_token: Option<String>,
    pub token_url: String,
    pub api_base: String,
    pub oembed_url: String,
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            bearer_token: None,
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            api_base: SPOTIFY_API_BASE.to_string(),
            oembed_url: SPOTIFY_OEMBED_URL.to_string(),
        }
    }
}

impl SpotifySettings {
    /// Read credentials from `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`
    /// and `SPOTIFY_BEARER_TOKEN`. Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            client_id: read("SPOTIFY_CLIENT_ID"),
            client_secret: read("SPOTIFY_CLIENT_SECRET"),
            bearer_token: read("SPOTIFY_BEARER_TOKEN"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppSettings::default();
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.page_timeout(), Duration::from_secs(15));
        assert_eq!(config.api_timeout(), Duration::from_secs(10));
        assert_eq!(config.download_timeout(), Duration::from_secs(15));
        assert!(config.spotify.bearer_token.is_none());
        assert_eq!(config.spotify.api_base, SPOTIFY_API_BASE);
    }

    #[test]
    fn test_spotify_settings_lookup_ignores_empty_values() {
        let vars: HashMap<&str, &str> = [
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "  "),
            ("SPOTIFY_BEARER_TOKEN", ""),
        ]
        .into_iter()
        .collect();

        let settings = SpotifySettings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(settings.client_id.as_deref(), Some("id"));
        assert!(settings.client_secret.is_none());
        assert!(settings.bearer_token.is_none());
        assert_eq!(settings.token_url, SPOTIFY_TOKEN_URL);
    }

    #[test]
    fn test_settings_deserialize_without_spotify_block() {
        let json = r#"{
            "download_location": "/music",
            "chunk_size": 4096,
            "page_timeout_secs": 5,
            "api_timeout_secs": 5,
            "download_timeout_secs": 30
        }"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.chunk_size, 4096);
        assert_eq!(settings.spotify.oembed_url, SPOTIFY_OEMBED_URL);
    }
}
