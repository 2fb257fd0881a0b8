//! audiograb - track metadata and audio downloads from Audiomack and Spotify

use anyhow::{anyhow, Context, Result};
use audiograb::downloader::{DownloadConfig, DownloadEngine, DownloadProgress};
use audiograb::extractor::HybridExtractor;
use audiograb::utils::{AppSettings, SpotifySettings};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_STEM: &str = "track";

#[derive(Parser)]
#[command(name = "audiograb", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the extracted metadata as JSON
    Info {
        url: String,
    },
    /// List the formats found for a URL
    Formats {
        url: String,
    },
    /// Print the direct audio URL for a format
    Url {
        url: String,

        /// Format id (default: first format with a URL)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Extract a track and download its audio
    Download {
        url: String,

        /// Destination file (default: <download dir>/<title>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format id to download (default: first format with a URL)
        #[arg(short, long)]
        format: Option<String>,

        /// Download timeout in seconds (headers and each chunk)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = AppSettings {
        spotify: SpotifySettings::from_env(),
        ..AppSettings::default()
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        match args.command {
            Command::Info { url } => info(&settings, &url).await,
            Command::Formats { url } => formats(&settings, &url).await,
            Command::Url { url, format } => direct_url(&settings, &url, format).await,
            Command::Download {
                url,
                output,
                format,
                timeout,
            } => download(&settings, &url, output, format, timeout).await,
        }
    })
}

async fn info(settings: &AppSettings, url: &str) -> Result<()> {
    let extractor = HybridExtractor::from_settings(settings)?;
    let media = extractor.extract_info(url).await?;
    println!("{}", serde_json::to_string_pretty(&media)?);
    Ok(())
}

async fn formats(settings: &AppSettings, url: &str) -> Result<()> {
    let extractor = HybridExtractor::from_settings(settings)?;
    for f in extractor.get_formats(url).await? {
        println!(
            "{}\t{}\t{}",
            f.format_id,
            f.ext,
            f.url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn direct_url(settings: &AppSettings, url: &str, format: Option<String>) -> Result<()> {
    let extractor = HybridExtractor::from_settings(settings)?;
    let direct = match format {
        Some(id) => extractor.get_direct_url(url, &id).await?,
        None => {
            let media = extractor.extract_info(url).await?;
            media
                .best_audio_url()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("no downloadable audio found for {}", url))?
        }
    };
    println!("{}", direct);
    Ok(())
}

async fn download(
    settings: &AppSettings,
    url: &str,
    output: Option<PathBuf>,
    format: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    let extractor = HybridExtractor::from_settings(settings)?;
    let media = extractor.extract_info(url).await?;

    let direct_url = match &format {
        Some(id) => media.format_url(id),
        None => media.best_audio_url(),
    }
    .map(str::to_string)
    .ok_or_else(|| anyhow!("no downloadable audio found for {}", url))?;
    let chosen = media
        .formats
        .iter()
        .find(|f| f.url.as_deref() == Some(direct_url.as_str()))
        .context("selected URL has no format entry")?;

    let output_path = output.unwrap_or_else(|| {
        let title = media.title.as_deref().unwrap_or(DEFAULT_STEM);
        let ext = match chosen.ext.as_str() {
            "preview" | "none" | "unknown" => "mp3",
            other => other,
        };
        settings
            .download_location
            .join(format!("{}.{}", sanitize_filename(title), ext))
    });

    let engine = DownloadEngine::new(DownloadConfig::from(settings))?;
    let mut on_progress = |p: &DownloadProgress| {
        if p.is_finished() {
            eprintln!("\nFinished: {} bytes", p.downloaded_bytes);
        } else {
            eprint!(
                "\rProgress: {:>3}%  {:.2} MB  {:.2} MB/s",
                p.percentage,
                p.downloaded_bytes as f64 / 1024.0 / 1024.0,
                p.speed.unwrap_or(0.0) / 1024.0 / 1024.0
            );
        }
    };

    engine
        .download(
            &direct_url,
            &output_path,
            Some(&mut on_progress),
            timeout.map(Duration::from_secs),
        )
        .await?;
    println!("{}", output_path.display());
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}
