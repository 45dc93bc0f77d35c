use thiserror::Error;

use crate::model::algorithm::{
    HashAlgorithm, Provider, SignatureAlgorithm, SignatureFormat, SignatureNiveau,
    SignaturePackaging,
};

pub mod core_config;

#[derive(Debug, Error)]
pub enum ConfigParsingError {
    #[error("Config parsing error: `{0}`")]
    GeneralParsingError(String),
}

/// Requested parameters cannot be served by the configured providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Provider `{0}` is not configured")]
    ProviderNotConfigured(Provider),
    #[error("Provider `{0}` is disabled")]
    ProviderDisabled(Provider),
    #[error("Provider `{provider}` does not offer niveau `{niveau}`")]
    NiveauNotSupported {
        provider: Provider,
        niveau: SignatureNiveau,
    },
    #[error("Provider `{0}` does not offer seals")]
    SealNotSupported(Provider),
    #[error("Provider `{0}` requires an explicit signature algorithm")]
    SignatureAlgorithmRequired(Provider),
    #[error("Signature algorithm `{algorithm}` is not offered by provider `{provider}`")]
    IncompatibleSignatureAlgorithm {
        provider: Provider,
        algorithm: SignatureAlgorithm,
    },
    #[error(
        "Hash algorithm `{hash_algorithm}` conflicts with signature algorithm `{signature_algorithm}`"
    )]
    AlgorithmConflict {
        signature_algorithm: SignatureAlgorithm,
        hash_algorithm: HashAlgorithm,
    },
    #[error("Packaging `{packaging}` cannot be used with format `{format}`")]
    IncompatibleProfile {
        format: SignatureFormat,
        packaging: SignaturePackaging,
    },
    #[error("Signature algorithm `{0}` is not offered by the signing certificate")]
    AlgorithmNotOffered(SignatureAlgorithm),
}

#[cfg(test)]
mod test;
