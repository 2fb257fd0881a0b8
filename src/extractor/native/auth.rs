//! Credential providers for the Spotify Web API
//!
//! Providers are tried in order and the first token wins. When every provider
//! fails, the collected causes are returned together so the caller can report
//! all of them.

use crate::utils::config::SpotifySettings;
use crate::utils::error::{GrabError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Something that can produce a bearer token
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn access_token(&self, client: &Client) -> Result<String>;
}

/// A token provisioned out of band; no network call
pub struct StaticBearer {
    token: Option<String>,
}

impl StaticBearer {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl CredentialProvider for StaticBearer {
    fn name(&self) -> &'static str {
        "bearer-token"
    }

    async fn access_token(&self, _client: &Client) -> Result<String> {
        self.token
            .clone()
            .ok_or_else(|| GrabError::Config("SPOTIFY_BEARER_TOKEN not configured".to_string()))
    }
}

/// OAuth client-credentials exchange against the token endpoint
pub struct ClientCredentials {
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

impl ClientCredentials {
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        token_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            token_url: token_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentials {
    fn name(&self) -> &'static str {
        "client-credentials"
    }

    async fn access_token(&self, client: &Client) -> Result<String> {
        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(GrabError::Config(
                "SPOTIFY client credentials not configured".to_string(),
            ));
        };

        debug!("Requesting client-credentials token from {}", self.token_url);
        let response = client
            .post(&self.token_url)
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GrabError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GrabError::InvalidResponse("token response has no access_token".to_string()))
    }
}

/// Causes collected from every provider that failed
#[derive(Debug, Default)]
pub struct AuthFailures(Vec<(&'static str, GrabError)>);

impl AuthFailures {
    pub fn causes(&self) -> impl Iterator<Item = (&'static str, &GrabError)> {
        self.0.iter().map(|(name, err)| (*name, err))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AuthFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no credential providers configured");
        }
        for (i, (name, err)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", name, err)?;
        }
        Ok(())
    }
}

/// Ordered credential providers
pub struct AuthChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl AuthChain {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Bearer token first, then the client-credentials exchange
    pub fn from_settings(settings: &SpotifySettings, timeout: Duration) -> Self {
        Self::new(vec![
            Box::new(StaticBearer::new(settings.bearer_token.clone())),
            Box::new(ClientCredentials::new(
                settings.client_id.clone(),
                settings.client_secret.clone(),
                settings.token_url.clone(),
                timeout,
            )),
        ])
    }

    /// First token any provider yields
    pub async fn authorize(&self, client: &Client) -> std::result::Result<String, AuthFailures> {
        let mut failures = AuthFailures::default();
        for provider in &self.providers {
            match provider.access_token(client).await {
                Ok(token) => {
                    debug!("Authorized via {}", provider.name());
                    return Ok(token);
                }
                Err(e) => {
                    debug!("Credential provider {} failed: {}", provider.name(), e);
                    failures.0.push((provider.name(), e));
                }
            }
        }
        Err(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new()
    }

    #[tokio::test]
    async fn test_static_bearer_used_without_network() {
        let chain = AuthChain::from_settings(
            &SpotifySettings {
                bearer_token: Some("preset".to_string()),
                // unroutable: any network call would fail
                token_url: "http://127.0.0.1:9/token".to_string(),
                ..Default::default()
            },
            Duration::from_secs(1),
        );
        assert_eq!(chain.authorize(&client()).await.unwrap(), "preset");
    }

    #[tokio::test]
    async fn test_missing_credentials_collects_both_causes() {
        let chain = AuthChain::from_settings(&SpotifySettings::default(), Duration::from_secs(1));
        let failures = chain.authorize(&client()).await.unwrap_err();

        let names: Vec<_> = failures.causes().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["bearer-token", "client-credentials"]);
        assert!(failures
            .causes()
            .all(|(_, err)| matches!(err, GrabError::Config(_))));

        let msg = failures.to_string();
        assert!(msg.contains("bearer-token:"));
        assert!(msg.contains("client credentials not configured"));
    }

    #[tokio::test]
    async fn test_client_credentials_requires_both_halves() {
        let provider = ClientCredentials::new(
            Some("id".to_string()),
            None,
            "http://127.0.0.1:9/token",
            Duration::from_secs(1),
        );
        let err = provider.access_token(&client()).await.unwrap_err();
        assert!(matches!(err, GrabError::Config(_)));
    }

    #[test]
    fn test_empty_failures_display() {
        assert!(AuthFailures::default().is_empty());
        assert_eq!(
            AuthFailures::default().to_string(),
            "no credential providers configured"
        );
    }
}
