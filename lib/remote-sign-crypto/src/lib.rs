use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretSlice;
use thiserror::Error;

pub mod hasher;
pub mod signer;
pub mod utilities;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CryptoProviderError {
    #[error("Missing hasher: `{0}`")]
    MissingHasher(String),
    #[error("Missing signer: `{0}`")]
    MissingSigner(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum HasherError {
    #[error("Could not hash")]
    CouldNotHash,
    #[error("Could not encode digest: `{0}`")]
    CouldNotEncode(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("Could not sign: `{0}`")]
    CouldNotSign(String),
    #[error("Could not extract keypair")]
    CouldNotExtractKeyPair,
    #[error("Could not extract public key: `{0}`")]
    CouldNotExtractPublicKey(String),
    #[error("Could not verify: `{0}`")]
    CouldNotVerify(String),
    #[error("Invalid signature")]
    InvalidSignature,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Hasher: Send + Sync {
    fn hash(&self, input: &[u8]) -> Result<Vec<u8>, HasherError>;

    fn hash_base64(&self, input: &[u8]) -> Result<String, HasherError>;
}

/// Signature primitive operating on a digest computed by the caller
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        digest: &[u8],
        public_key: &[u8],
        private_key: &SecretSlice<u8>,
    ) -> Result<Vec<u8>, SignerError>;

    fn verify(&self, digest: &[u8], signature: &[u8], public_key: &[u8])
    -> Result<(), SignerError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CryptoProvider: Send + Sync {
    fn get_hasher(&self, hasher: &str) -> Result<Arc<dyn Hasher>, CryptoProviderError>;

    fn get_signer(&self, signer: &str) -> Result<Arc<dyn Signer>, CryptoProviderError>;
}

#[derive(Clone)]
pub struct CryptoProviderImpl {
    hashers: HashMap<String, Arc<dyn Hasher>>,
    signers: HashMap<String, Arc<dyn Signer>>,
}

impl CryptoProviderImpl {
    pub fn new(
        hashers: HashMap<String, Arc<dyn Hasher>>,
        signers: HashMap<String, Arc<dyn Signer>>,
    ) -> Self {
        Self { hashers, signers }
    }
}

impl Default for CryptoProviderImpl {
    /// All hashers and signers this crate ships with
    fn default() -> Self {
        let hashers: HashMap<String, Arc<dyn Hasher>> = HashMap::from([
            (
                hasher::sha::SHA256_ID.to_string(),
                Arc::new(hasher::sha::SHA256) as Arc<dyn Hasher>,
            ),
            (
                hasher::sha::SHA384_ID.to_string(),
                Arc::new(hasher::sha::SHA384) as Arc<dyn Hasher>,
            ),
            (
                hasher::sha::SHA512_ID.to_string(),
                Arc::new(hasher::sha::SHA512) as Arc<dyn Hasher>,
            ),
        ]);

        let signers: HashMap<String, Arc<dyn Signer>> = HashMap::from([
            (
                signer::ecdsa::ECDSA_ID.to_string(),
                Arc::new(signer::ecdsa::ECDSASigner::default()) as Arc<dyn Signer>,
            ),
            (
                signer::ecdsa::PLAIN_ECDSA_ID.to_string(),
                Arc::new(signer::ecdsa::ECDSASigner::plain()) as Arc<dyn Signer>,
            ),
        ]);

        Self::new(hashers, signers)
    }
}

impl CryptoProvider for CryptoProviderImpl {
    fn get_hasher(&self, hasher: &str) -> Result<Arc<dyn Hasher>, CryptoProviderError> {
        Ok(self
            .hashers
            .get(hasher)
            .ok_or(CryptoProviderError::MissingHasher(hasher.to_owned()))?
            .clone())
    }

    fn get_signer(&self, signer: &str) -> Result<Arc<dyn Signer>, CryptoProviderError> {
        Ok(self
            .signers
            .get(signer)
            .ok_or(CryptoProviderError::MissingSigner(signer.to_owned()))?
            .clone())
    }
}

#[cfg(test)]
mod test;
