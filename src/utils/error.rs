//! Error handling for audiograb

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, GrabError>;

/// Main error type for audiograb
#[derive(Debug, Error)]
pub enum GrabError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token exchange failed: {status} {body}")]
    TokenExchange { status: u16, body: String },

    #[error("API error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("Unsupported resource type: {0}")]
    UnsupportedResource(String),

    #[error("No playable format '{format_id}' found by {extractor}")]
    FormatNotFound {
        format_id: String,
        extractor: &'static str,
    },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{context} (HTTP {status})")]
    UnexpectedStatus { status: u16, context: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),

    #[error("Failed to write {}: {source}. Check disk space and permissions.", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GrabError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GrabError::Api { status, .. }
            | GrabError::TokenExchange { status, .. }
            | GrabError::UnexpectedStatus { status, .. } => Some(*status),
            GrabError::AccessDenied(_) => Some(403),
            GrabError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GrabError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for GrabError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GrabError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            GrabError::Transport(format!("connection error: {}", err))
        } else if err.is_decode() {
            GrabError::InvalidResponse(err.to_string())
        } else {
            GrabError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_disk_space_hint() {
        let err = GrabError::io(
            "/tmp/out.mp3",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.mp3"));
        assert!(msg.contains("disk space and permissions"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(GrabError::NotFound("x".into()).status(), Some(404));
        assert_eq!(GrabError::AccessDenied("x".into()).status(), Some(403));
        assert_eq!(
            GrabError::Api {
                status: 500,
                body: "boom".into()
            }
            .status(),
            Some(500)
        );
        assert_eq!(GrabError::Transport("reset".into()).status(), None);
    }

    #[test]
    fn test_format_not_found_display() {
        let err = GrabError::FormatNotFound {
            format_id: "flac".into(),
            extractor: "audiomack",
        };
        assert_eq!(err.to_string(), "No playable format 'flac' found by audiomack");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error_display_includes_body() {
        let err = GrabError::Api {
            status: 401,
            body: "{\"error\":\"invalid token\"}".into(),
        };
        assert_eq!(err.to_string(), "API error: 401 {\"error\":\"invalid token\"}");
    }
}
