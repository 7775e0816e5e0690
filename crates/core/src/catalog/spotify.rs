//! Spotify Web API client.
//!
//! Uses the client credentials flow: no user login, only public catalog
//! data. The access token is cached and refreshed shortly before it expires.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::types::{CatalogEpisode, CatalogTrack};
use super::{CatalogError, MetadataCatalog};

/// Tokens this close to expiry are treated as expired.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Spotify API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// Application client id (required).
    pub client_id: String,
    /// Application client secret (required).
    pub client_secret: String,
    /// Market used for episode lookups, which Spotify requires for
    /// client credentials tokens.
    #[serde(default = "default_market")]
    pub market: String,
    /// Web API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Token endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_market() -> String {
    "US".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_auth_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Spotify Web API client.
pub struct SpotifyClient {
    client: Client,
    config: SpotifyConfig,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Create a new Spotify client. Does not contact the API.
    pub fn new(config: SpotifyConfig) -> Result<Self, CatalogError> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(CatalogError::NotConfigured(
                "Spotify client_id and client_secret are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    async fn request_token(&self) -> Result<CachedToken, CatalogError> {
        debug!("Requesting Spotify access token");

        let response = self
            .client
            .post(&self.config.auth_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unauthorized(format!(
                "Spotify rejected client credentials: {}",
                body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        info!(expires_in = token.expires_in, "Obtained Spotify access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        })
    }

    /// Current access token, fetching a new one if missing or about to expire.
    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    /// GET a catalog object. 404 maps to `Ok(None)`.
    async fn get_object<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, CatalogError> {
        let url = format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), path);
        let token = self.access_token().await?;

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "Spotify object not found");
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("Spotify access token rejected, dropping cached token");
            self.invalidate_token().await;
            return Err(CatalogError::Unauthorized(
                "Access token rejected".to_string(),
            ));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let object: T = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {} response: {}", path, e))
        })?;

        Ok(Some(object))
    }
}

#[async_trait]
impl MetadataCatalog for SpotifyClient {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn authenticate(&self) -> Result<(), CatalogError> {
        let token = self.request_token().await?;
        *self.token.lock().await = Some(token);
        Ok(())
    }

    async fn get_track(&self, id: &str) -> Result<Option<CatalogTrack>, CatalogError> {
        debug!("Spotify get track: id={}", id);
        self.get_object(&format!("tracks/{}", urlencoding::encode(id)), &[])
            .await
    }

    async fn get_episode(&self, id: &str) -> Result<Option<CatalogEpisode>, CatalogError> {
        debug!("Spotify get episode: id={}", id);
        self.get_object(
            &format!("episodes/{}", urlencoding::encode(id)),
            &[("market", self.config.market.as_str())],
        )
        .await
    }
}
