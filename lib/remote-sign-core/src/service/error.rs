use thiserror::Error;

use crate::config::{ConfigParsingError, ConfigurationError};
use crate::provider::crypto_codec::CodecError;
use crate::provider::gateway::GatewayError;
use crate::provider::gateway::model::UserState;
use crate::provider::oauth::OAuthClientError;
use crate::provider::proof::ProofError;
use crate::service::assembly::AssemblyError;
use crate::service::correlation::CorrelationError;
use crate::service::transaction::error::TransactionError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: `{0}`")]
    Configuration(#[from] ConfigurationError),
    #[error("Config parsing error: `{0}`")]
    ConfigParsing(#[from] ConfigParsingError),
    #[error("Correlation error: `{0}`")]
    Correlation(#[from] CorrelationError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error("Gateway error: `{0}`")]
    Gateway(#[from] GatewayError),
    #[error("Codec error: `{0}`")]
    Codec(#[from] CodecError),
    #[error("Proof error: `{0}`")]
    Proof(#[from] ProofError),
    #[error("OAuth error: `{0}`")]
    OAuth(#[from] OAuthClientError),
    #[error("User `{user_id}` cannot sign in state `{state}`")]
    UserNotReady { user_id: String, state: UserState },
    #[error("No matching signing certificate")]
    MissingSigningCertificate,
}
