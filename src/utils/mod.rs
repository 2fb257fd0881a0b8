//! Utility modules for error handling, configuration and HTTP plumbing

pub mod config;
pub mod error;
pub mod http;

// Re-export for convenience
pub use config::{AppSettings, SpotifySettings};
pub use error::{GrabError, Result};
