//! OAuth 2.0 client-credentials access tokens for the gateway

use std::ops::Add;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use url::Url;

use crate::config::core_config::OAuthConfig;
use crate::provider::http_client::{self, HttpClient};

mod dto;

use dto::{TokenRequestDTO, TokenResponseDTO};

#[derive(Debug, Error)]
pub enum OAuthClientError {
    #[error("Token request failed: `{0}`")]
    Failed(String),
    #[error("Unsupported token type: `{0}`")]
    UnsupportedTokenType(String),
    #[error("Invalid issuer URI: `{0}`")]
    InvalidIssuer(String),
    #[error("HTTP client error: `{0}`")]
    HttpClient(#[from] http_client::Error),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Bearer token valid for at least a few more seconds
    async fn access_token(&self) -> Result<SecretString, OAuthClientError>;
}

struct CachedAccessToken {
    token: SecretString,
    valid_until: OffsetDateTime,
}

pub struct ClientCredentialsTokenProvider {
    http_client: Arc<dyn HttpClient>,
    token_endpoint: Url,
    client_id: String,
    client_secret: SecretString,
    access_token: Arc<Mutex<Option<CachedAccessToken>>>,
}

/// Tolerance for the network delay of requests using the token
const EXPIRY_TOLERANCE: Duration = Duration::seconds(5);

impl ClientCredentialsTokenProvider {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        config: &OAuthConfig,
    ) -> Result<Self, OAuthClientError> {
        let token_endpoint = token_endpoint(&config.issuer_uri)?;

        Ok(Self {
            http_client,
            token_endpoint,
            client_id: config.client_id.to_owned(),
            client_secret: config.client_secret.clone(),
            access_token: Arc::new(Mutex::new(None)),
        })
    }

    async fn acquire_new_token(&self) -> Result<TokenResponseDTO, OAuthClientError> {
        // client credentials are form-urlencoded before basic encoding, RFC 6749 section 2.3.1
        let response: TokenResponseDTO = self
            .http_client
            .post(self.token_endpoint.as_str())
            .basic_auth(
                &urlencoding::encode(&self.client_id),
                &urlencoding::encode(self.client_secret.expose_secret()),
            )?
            .form(TokenRequestDTO::ClientCredentials)?
            .send()
            .await?
            .error_for_status()?
            .json()?;

        if !response.token_type.eq_ignore_ascii_case("bearer") {
            return Err(OAuthClientError::UnsupportedTokenType(response.token_type));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl AccessTokenProvider for ClientCredentialsTokenProvider {
    async fn access_token(&self) -> Result<SecretString, OAuthClientError> {
        let mut storage = self.access_token.lock().await;

        if let Some(cached) = storage.as_ref() {
            if cached.valid_until > OffsetDateTime::now_utc().add(EXPIRY_TOLERANCE) {
                return Ok(cached.token.clone());
            }
        }

        tracing::debug!("Acquiring new access token");
        let response = self.acquire_new_token().await?;
        let valid_until = OffsetDateTime::now_utc()
            .checked_add(Duration::seconds(response.expires_in))
            .ok_or_else(|| {
                OAuthClientError::Failed(format!("expires_in out of range: {}", response.expires_in))
            })?;

        *storage = Some(CachedAccessToken {
            token: response.access_token.clone(),
            valid_until,
        });

        Ok(response.access_token)
    }
}

fn token_endpoint(issuer_uri: &Url) -> Result<Url, OAuthClientError> {
    let mut endpoint = issuer_uri.clone();
    endpoint
        .path_segments_mut()
        .map_err(|_| OAuthClientError::InvalidIssuer(issuer_uri.to_string()))?
        .pop_if_empty()
        .extend(["protocol", "openid-connect", "token"]);

    Ok(endpoint)
}
