//! Shared HTTP client setup and status classification

use crate::utils::error::{GrabError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Build the browser-like client shared by the extractors and the downloader.
///
/// No client-wide timeout is set; each call applies its own.
pub fn build_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| GrabError::Transport(format!("failed to create HTTP client: {}", e)))
}

/// Map a page/media response status onto the error categories.
///
/// `what` names the resource for the user-facing message ("track", "audio file").
pub fn check_status(status: StatusCode, what: &str) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::FORBIDDEN => Err(GrabError::AccessDenied(format!(
            "this {} is not publicly accessible. It may be premium-only or region-restricted",
            what
        ))),
        StatusCode::NOT_FOUND => Err(GrabError::NotFound(format!(
            "{} not found. It may have been deleted or made private",
            what
        ))),
        other => Err(GrabError::UnexpectedStatus {
            status: other.as_u16(),
            context: format!("Failed to access {}", what),
        }),
    }
}

/// Pages must come back as exactly 200; other 2xx codes are unexpected here.
pub fn check_page_status(status: StatusCode, what: &str) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        s if s.is_success() => Err(GrabError::UnexpectedStatus {
            status: s.as_u16(),
            context: format!("Failed to access {}", what),
        }),
        other => check_status(other, what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_success() {
        assert!(check_status(StatusCode::OK, "track").is_ok());
        assert!(check_status(StatusCode::PARTIAL_CONTENT, "track").is_ok());
    }

    #[test]
    fn test_check_status_categories() {
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN, "track"),
            Err(GrabError::AccessDenied(_))
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "track"),
            Err(GrabError::NotFound(_))
        ));
        match check_status(StatusCode::BAD_GATEWAY, "audio file") {
            Err(GrabError::UnexpectedStatus { status, context }) => {
                assert_eq!(status, 502);
                assert!(context.contains("audio file"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_check_page_status_requires_ok() {
        assert!(check_page_status(StatusCode::OK, "track").is_ok());
        assert!(matches!(
            check_page_status(StatusCode::NO_CONTENT, "track"),
            Err(GrabError::UnexpectedStatus { status: 204, .. })
        ));
        assert!(matches!(
            check_page_status(StatusCode::FORBIDDEN, "track"),
            Err(GrabError::AccessDenied(_))
        ));
        assert!(matches!(
            check_page_status(StatusCode::NOT_FOUND, "track"),
            Err(GrabError::NotFound(_))
        ));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client().is_ok());
    }
}
