use crate::extractor::models::{Format, MediaInfo};
use crate::extractor::native::auth::AuthChain;
use crate::extractor::traits::Extractor;
use crate::utils::config::{AppSettings, SpotifySettings};
use crate::utils::error::{GrabError, Result};
use crate::utils::http::build_client;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Spotify resource addressed by a share URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyResource {
    pub kind: String,
    pub id: String,
}

/// Parse `https://open.spotify.com/{kind}/{id}`.
///
/// Locale prefixes (`/intl-de/`) are skipped. Returns `None` for anything
/// that is not a Spotify URL with at least two path segments.
pub fn parse_spotify_url(url: &str) -> Option<SpotifyResource> {
    let parsed = Url::parse(url).ok()?;
    if !is_spotify_host(&parsed) {
        return None;
    }

    let mut segments = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .skip_while(|s| s.starts_with("intl-"));
    let kind = segments.next()?.to_string();
    let id = segments.next()?.to_string();
    Some(SpotifyResource { kind, id })
}

fn is_spotify_host(url: &Url) -> bool {
    url.host_str()
        .map(|h| h.to_lowercase().contains("spotify"))
        .unwrap_or(false)
}

/// Track, album and playlist metadata from the Spotify Web API
///
/// Falls back to the public oEmbed endpoint (title, author and thumbnail
/// only) when no credential is available.
pub struct SpotifyExtractor {
    client: Client,
    settings: SpotifySettings,
    auth: AuthChain,
    timeout: Duration,
}

impl SpotifyExtractor {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        Ok(Self::with_client(
            build_client()?,
            settings.spotify.clone(),
            settings.api_timeout(),
        ))
    }

    pub fn with_client(client: Client, settings: SpotifySettings, timeout: Duration) -> Self {
        let auth = AuthChain::from_settings(&settings, timeout);
        Self {
            client,
            settings,
            auth,
            timeout,
        }
    }

    /// Replace the default credential chain
    pub fn with_auth(mut self, auth: AuthChain) -> Self {
        self.auth = auth;
        self
    }

    async fn api_get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let url = format!("{}/{}", self.settings.api_base.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GrabError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn oembed(&self, url: &str) -> Result<MediaInfo> {
        let response = self
            .client
            .get(&self.settings.oembed_url)
            .query(&[("url", url)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GrabError::UnexpectedStatus {
                status: status.as_u16(),
                context: format!("oEmbed failed: {}", body),
            });
        }

        let data: OEmbed = response.json().await?;
        Ok(MediaInfo {
            title: data.title,
            uploader: data.author_name,
            thumbnail: data.thumbnail_url,
            ..Default::default()
        })
    }

    async fn fetch_track(&self, id: &str, token: &str) -> Result<MediaInfo> {
        let track: Track = self.api_get(&format!("tracks/{}", id), token).await?;

        let artists: Vec<&str> = track
            .artists
            .iter()
            .filter_map(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
            .collect();

        let mut formats = Vec::new();
        if let Some(preview) = track.preview_url {
            formats.push(Format::new("preview", "mp3", Some(preview)));
        }

        Ok(MediaInfo {
            title: track.name,
            uploader: (!artists.is_empty()).then(|| artists.join(", ")),
            thumbnail: track.album.and_then(|a| first_image(&a.images)),
            duration: Some(track.duration_ms / 1000),
            formats,
        })
    }

    async fn fetch_album(&self, id: &str, token: &str) -> Result<MediaInfo> {
        let album: Album = self.api_get(&format!("albums/{}", id), token).await?;

        Ok(MediaInfo {
            title: album.name,
            uploader: album.artists.first().and_then(|a| a.name.clone()),
            thumbnail: first_image(&album.images),
            duration: None,
            formats: album.tracks.items.into_iter().map(preview_format).collect(),
        })
    }

    async fn fetch_playlist(&self, id: &str, token: &str) -> Result<MediaInfo> {
        let playlist: Playlist = self.api_get(&format!("playlists/{}", id), token).await?;

        Ok(MediaInfo {
            title: playlist.name,
            uploader: playlist.owner.and_then(|o| o.display_name),
            thumbnail: first_image(&playlist.images),
            duration: None,
            formats: playlist
                .tracks
                .items
                .into_iter()
                .map(|item| preview_format(item.track.unwrap_or_default()))
                .collect(),
        })
    }
}

#[async_trait]
impl Extractor for SpotifyExtractor {
    fn id(&self) -> &'static str {
        "spotify"
    }

    // Malformed Spotify URLs still land here so they fail as invalid
    fn supports(&self, url: &str) -> bool {
        Url::parse(url).map(|u| is_spotify_host(&u)).unwrap_or(false)
    }

    async fn extract_info(&self, url: &str) -> Result<MediaInfo> {
        let resource = parse_spotify_url(url)
            .ok_or_else(|| GrabError::InvalidUrl(format!("Invalid Spotify URL: {}", url)))?;
        info!("Extracting Spotify {} {}", resource.kind, resource.id);

        let token = match self.auth.authorize(&self.client).await {
            Ok(token) => token,
            Err(failures) => {
                warn!("No Spotify credentials available ({}), falling back to oEmbed", failures);
                return self.oembed(url).await.map_err(|oembed_err| {
                    GrabError::Auth(format!(
                        "Spotify credentials or bearer token are required for full metadata (preview URLs). \
                         Credential attempts: {}. Fallback oEmbed failed: {}",
                        failures, oembed_err
                    ))
                });
            }
        };

        let mut media = match resource.kind.as_str() {
            "track" => self.fetch_track(&resource.id, &token).await?,
            "album" => self.fetch_album(&resource.id, &token).await?,
            "playlist" => self.fetch_playlist(&resource.id, &token).await?,
            other => return Err(GrabError::UnsupportedResource(other.to_string())),
        };
        media.dedup_formats();

        info!(
            "Extracted Spotify {} with {} format(s)",
            resource.kind,
            media.formats.len()
        );
        Ok(media)
    }
}

fn first_image(images: &[Image]) -> Option<String> {
    images.first().and_then(|i| i.url.clone())
}

/// One entry per album/playlist track; `url` is unset when no preview exists
fn preview_format(track: TrackRef) -> Format {
    let ext = if track.preview_url.is_some() { "preview" } else { "none" };
    Format::new(track.id.unwrap_or_default(), ext, track.preview_url)
}

// ============================================================================
// Spotify Web API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Image {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Artist {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AlbumRef {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<Artist>,
    album: Option<AlbumRef>,
    #[serde(default)]
    duration_ms: u64,
    preview_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TrackRef {
    id: Option<String>,
    preview_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Page<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Album {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<Artist>,
    #[serde(default)]
    images: Vec<Image>,
    #[serde(default)]
    tracks: Page<TrackRef>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistItem {
    track: Option<TrackRef>,
}

#[derive(Debug, Deserialize)]
struct Playlist {
    name: Option<String>,
    owner: Option<Owner>,
    #[serde(default)]
    images: Vec<Image>,
    #[serde(default)]
    tracks: Page<PlaylistItem>,
}
