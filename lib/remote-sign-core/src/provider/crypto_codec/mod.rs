//! Digesting, container encoding and signature validation

use thiserror::Error;

use crate::model::algorithm::{HashAlgorithm, SignatureAlgorithm};
use crate::model::transaction::ValidationData;

pub mod cbor;
pub mod model;

use model::{Indication, SignatureInput, SigningContext};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported signature algorithm: `{0}`")]
    UnsupportedAlgorithm(SignatureAlgorithm),
    #[error("Missing signing certificate")]
    MissingSigningCertificate,
    #[error("Invalid signing certificate: `{0}`")]
    InvalidCertificate(String),
    #[error("Encoding error: `{0}`")]
    Encoding(String),
    #[error("Decoding error: `{0}`")]
    Decoding(String),
    #[error("Digest of `{0}` failed: `{1}`")]
    Digest(HashAlgorithm, String),
    #[error("Crypto provider error: `{0}`")]
    CryptoProvider(#[from] remote_sign_crypto::CryptoProviderError),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CryptoCodec: Send + Sync {
    fn digest(&self, hash_algorithm: HashAlgorithm, content: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Bytes the provider signs for a to-be-signed unit
    fn data_to_be_signed(
        &self,
        content: &[u8],
        context: &SigningContext,
    ) -> Result<Vec<u8>, CodecError>;

    /// Checks a raw value against the data to be signed and the signing certificate
    fn is_valid_signature_value(
        &self,
        data_to_be_signed: &[u8],
        signature_value: &[u8],
        context: &SigningContext,
    ) -> Result<bool, CodecError>;

    /// Builds the container (detached, enveloping) or the signed copy of the content (enveloped)
    fn incorporate(
        &self,
        content: &[u8],
        context: &SigningContext,
        input: &SignatureInput,
    ) -> Result<Vec<u8>, CodecError>;

    /// Adds chain and revocation material; applying the same data twice changes nothing
    fn extend_with_validation_data(
        &self,
        signed: &[u8],
        validation_data: &ValidationData,
    ) -> Result<Vec<u8>, CodecError>;

    /// Validates `signed` against the original content
    fn validate(&self, original: &[u8], signed: &[u8]) -> Result<Indication, CodecError>;
}
