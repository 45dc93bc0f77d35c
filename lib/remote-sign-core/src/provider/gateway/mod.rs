//! Remote signing provider API

use secrecy::SecretString;
use shared_types::DocumentId;
use thiserror::Error;
use url::Url;

use crate::model::algorithm::Provider;
use crate::model::transaction::TransactionAddress;
use crate::provider::http_client;
use crate::provider::oauth::OAuthClientError;

pub mod http;
pub mod model;

use model::{
    CreateTransactionRequest, DigestToTimestamp, Seal, SigningCertificate, TimestampToken,
    TransactionSnapshot, User, UserState,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Transport error: `{0}`")]
    Transport(String),
    #[error("Gateway responded with status `{0}`")]
    Status(u16),
    #[error("TAN rejected")]
    TanRejected,
    #[error("Authorization failed: `{0}`")]
    Unauthorized(#[from] OAuthClientError),
    #[error("Mapping error: `{0}`")]
    MappingError(String),
}

impl GatewayError {
    /// Whether repeating an idempotent request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            Self::TanRejected | Self::Unauthorized(_) | Self::MappingError(_) => false,
        }
    }
}

impl From<http_client::Error> for GatewayError {
    fn from(error: http_client::Error) -> Self {
        match error {
            http_client::Error::Status(status) => Self::Status(status.0),
            http_client::Error::Json(error) => Self::MappingError(error.to_string()),
            error => Self::Transport(error.to_string()),
        }
    }
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SigningGateway: Send + Sync {
    async fn create_transaction(
        &self,
        provider: Provider,
        request: &CreateTransactionRequest,
    ) -> Result<TransactionSnapshot, GatewayError>;

    /// Forwards a TAN, [`GatewayError::TanRejected`] when the provider refuses it
    async fn authorize_by_tan(
        &self,
        provider: Provider,
        address: &TransactionAddress,
        tan: &SecretString,
    ) -> Result<(), GatewayError>;

    async fn get_transaction(
        &self,
        provider: Provider,
        address: &TransactionAddress,
    ) -> Result<TransactionSnapshot, GatewayError>;

    async fn get_available_seals(&self, provider: Provider) -> Result<Vec<Seal>, GatewayError>;

    async fn get_seal_certificate(
        &self,
        provider: Provider,
        seal_id: &str,
    ) -> Result<SigningCertificate, GatewayError>;

    async fn get_user(&self, provider: Provider, user_id: &str) -> Result<User, GatewayError>;

    async fn get_user_state(
        &self,
        provider: Provider,
        user_id: &str,
    ) -> Result<UserState, GatewayError>;

    async fn get_user_certificates(
        &self,
        provider: Provider,
        user_id: &str,
    ) -> Result<Vec<SigningCertificate>, GatewayError>;

    async fn request_timestamps(
        &self,
        timestamp_provider: &str,
        digests: Vec<DigestToTimestamp>,
    ) -> Result<Vec<TimestampToken>, GatewayError>;

    async fn upload_document(
        &self,
        provider: Provider,
        content: Vec<u8>,
    ) -> Result<DocumentId, GatewayError>;

    async fn download(&self, href: &Url) -> Result<Vec<u8>, GatewayError>;
}
