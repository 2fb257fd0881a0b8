//! Streaming download engine

use crate::downloader::progress::DownloadProgress;
use crate::utils::config::AppSettings;
use crate::utils::error::{GrabError, Result};
use crate::utils::http::{build_client, check_status};
use futures::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Receives every progress event of a download
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(&DownloadProgress) + Send);

/// Download configuration
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub chunk_size: usize, // Max bytes written per progress event (default: 8192)
    pub timeout: Duration, // Wait for headers and for each chunk (default: 15s)
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            timeout: Duration::from_secs(15),
        }
    }
}

impl From<&AppSettings> for DownloadConfig {
    fn from(settings: &AppSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            timeout: settings.download_timeout(),
        }
    }
}

/// Single-request streaming downloader
pub struct DownloadEngine {
    client: Client,
    config: DownloadConfig,
}

impl DownloadEngine {
    /// Create new download engine with configuration
    pub fn new(config: DownloadConfig) -> Result<Self> {
        Ok(Self::with_client(build_client()?, config))
    }

    pub fn with_client(client: Client, config: DownloadConfig) -> Self {
        Self { client, config }
    }

    /// Stream `url` into `output_path`, returning the number of bytes written.
    ///
    /// `timeout` overrides the configured one. A failure mid-stream leaves the
    /// partially written file in place.
    pub async fn download(
        &self,
        url: &str,
        output_path: &Path,
        mut on_progress: Option<ProgressCallback<'_>>,
        timeout: Option<Duration>,
    ) -> Result<u64> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        let chunk_size = self.config.chunk_size.max(1);
        info!("Downloading {} -> {}", url, output_path.display());

        let response = tokio::time::timeout(timeout, self.client.get(url).send())
            .await
            .map_err(|_| timed_out())??;
        check_status(response.status(), "audio file")?;

        let total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        debug!("Content-Length: {}", total);

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GrabError::io(parent, e))?;
        }

        let mut file = File::create(output_path)
            .await
            .map_err(|e| GrabError::io(output_path, e))?;
        let mut downloaded = 0u64;
        let start_time = Instant::now();

        // Stream response to file
        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = tokio::time::timeout(timeout, stream.next())
            .await
            .map_err(|_| timed_out())?
        {
            let chunk = chunk_result?;
            for piece in chunk.chunks(chunk_size) {
                file.write_all(piece)
                    .await
                    .map_err(|e| GrabError::io(output_path, e))?;
                downloaded += piece.len() as u64;

                if let Some(callback) = on_progress.as_deref_mut() {
                    let elapsed = start_time.elapsed().as_secs_f64();
                    callback(&DownloadProgress::downloading(downloaded, total, elapsed));
                }
            }
        }

        // Ensure file is flushed
        file.flush()
            .await
            .map_err(|e| GrabError::io(output_path, e))?;

        if let Some(callback) = on_progress.as_deref_mut() {
            callback(&DownloadProgress::finished(downloaded, total));
        }

        info!(
            "Downloaded {} bytes in {:.1}s",
            downloaded,
            start_time.elapsed().as_secs_f64()
        );
        Ok(downloaded)
    }
}

fn timed_out() -> GrabError {
    GrabError::Transport("Download timed out. Please try again.".to_string())
}
