//! Derivation of complete [`AlgorithmParameters`] from a partial request

use std::sync::Arc;

use crate::config::ConfigurationError;
use crate::config::core_config::ProviderConfig;
use crate::model::algorithm::{
    AlgorithmParameters, HashAlgorithm, Provider, SignatureAlgorithm, SignatureFormat,
    SignatureNiveau, SignaturePackaging, SignatureProfile,
};
use crate::model::transaction::TargetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmRequest {
    pub provider: Provider,
    pub target: TargetKind,
    pub niveau: SignatureNiveau,
    pub hash_algorithm: Option<HashAlgorithm>,
    pub signature_algorithm: Option<SignatureAlgorithm>,
    pub profile: SignatureProfile,
}

/// Hash used when neither a hash nor a signature algorithm is requested
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

#[derive(Clone)]
pub struct AlgorithmResolver {
    providers: Arc<ProviderConfig>,
}

impl AlgorithmResolver {
    pub fn new(providers: Arc<ProviderConfig>) -> Self {
        Self { providers }
    }

    pub fn resolve(
        &self,
        request: &AlgorithmRequest,
    ) -> Result<AlgorithmParameters, ConfigurationError> {
        let provider = request.provider;
        self.providers.get_enabled(provider)?;

        let capabilities = provider.capabilities();
        if !capabilities.niveaus.contains(&request.niveau) {
            return Err(ConfigurationError::NiveauNotSupported {
                provider,
                niveau: request.niveau,
            });
        }
        if request.target == TargetKind::Seal && !capabilities.seal {
            return Err(ConfigurationError::SealNotSupported(provider));
        }

        validate_profile(&request.profile)?;

        let signature_algorithm = match request.signature_algorithm {
            Some(signature_algorithm) => {
                let offered = capabilities.encryption_algorithm.is_none_or(|family| {
                    family.is_compatible_with(&signature_algorithm.encryption_algorithm())
                });
                if !offered {
                    return Err(ConfigurationError::IncompatibleSignatureAlgorithm {
                        provider,
                        algorithm: signature_algorithm,
                    });
                }

                match request.hash_algorithm {
                    Some(hash_algorithm)
                        if hash_algorithm != signature_algorithm.hash_algorithm() =>
                    {
                        return Err(ConfigurationError::AlgorithmConflict {
                            signature_algorithm,
                            hash_algorithm,
                        });
                    }
                    _ => signature_algorithm,
                }
            }
            None => {
                let family = capabilities
                    .encryption_algorithm
                    .ok_or(ConfigurationError::SignatureAlgorithmRequired(provider))?;

                SignatureAlgorithm::from_parts(
                    family,
                    request.hash_algorithm.unwrap_or(DEFAULT_HASH_ALGORITHM),
                )
            }
        };

        let parameters = AlgorithmParameters {
            niveau: request.niveau,
            hash_algorithm: signature_algorithm.hash_algorithm(),
            signature_algorithm,
            encryption_algorithm: signature_algorithm.encryption_algorithm(),
            level: request.profile.level,
            format: request.profile.format,
            packaging: request.profile.packaging,
        };

        tracing::debug!(
            "Resolved {} {} for provider {provider}",
            parameters.niveau,
            parameters.signature_algorithm
        );
        Ok(parameters)
    }
}

/// PAdES signatures live inside the PDF, every other packaging is CAdES
fn validate_profile(profile: &SignatureProfile) -> Result<(), ConfigurationError> {
    let compatible = matches!(
        (profile.format, profile.packaging),
        (SignatureFormat::Pades, SignaturePackaging::Enveloped)
            | (
                SignatureFormat::Cades,
                SignaturePackaging::Enveloping | SignaturePackaging::Detached
            )
    );

    if compatible {
        Ok(())
    } else {
        Err(ConfigurationError::IncompatibleProfile {
            format: profile.format,
            packaging: profile.packaging,
        })
    }
}
