//! Download engine module

pub mod engine;
pub mod progress;

// Re-export for convenience
pub use engine::{DownloadConfig, DownloadEngine, ProgressCallback};
pub use progress::{DownloadProgress, DownloadStatus};
