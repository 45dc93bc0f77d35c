use std::sync::Arc;

use remote_sign_crypto::hasher::sha::{SHA256, SHA384, SHA512};
use remote_sign_crypto::signer::ecdsa::ECDSASigner;
use remote_sign_crypto::{CryptoProviderImpl, Hasher, Signer};
use secrecy::SecretSlice;

use crate::model::algorithm::{
    AlgorithmParameters, EncryptionAlgorithm, HashAlgorithm, SignatureAlgorithm, SignatureFormat,
    SignatureLevel, SignatureNiveau, SignaturePackaging,
};
use crate::provider::crypto_codec::CryptoCodec;
use crate::provider::crypto_codec::cbor::CborContainerCodec;
use crate::provider::crypto_codec::model::{SignatureInput, SigningContext};

pub fn ecdsa_parameters(packaging: SignaturePackaging, level: SignatureLevel) -> AlgorithmParameters {
    AlgorithmParameters {
        niveau: SignatureNiveau::Qualified,
        hash_algorithm: HashAlgorithm::Sha256,
        signature_algorithm: SignatureAlgorithm::EcdsaSha256,
        encryption_algorithm: EncryptionAlgorithm::Ecdsa,
        level,
        format: match packaging {
            SignaturePackaging::Enveloped => SignatureFormat::Pades,
            _ => SignatureFormat::Cades,
        },
        packaging,
    }
}

pub fn codec() -> CborContainerCodec {
    CborContainerCodec::new(Arc::new(CryptoProviderImpl::default()))
}

/// Signing key held by a simulated remote provider
pub struct ProviderKey {
    pub public: Vec<u8>,
    private: SecretSlice<u8>,
}

impl ProviderKey {
    pub fn generate() -> Self {
        let key_pair = ECDSASigner::generate_key_pair();
        Self {
            public: key_pair.public,
            private: key_pair.private,
        }
    }

    pub fn context(&self, parameters: AlgorithmParameters) -> SigningContext {
        SigningContext {
            parameters,
            signing_certificate: Some(self.public.clone()),
        }
    }

    /// Signature value over the given data to be signed, as the provider returns it
    pub fn sign(&self, data_to_be_signed: &[u8], hash_algorithm: HashAlgorithm) -> Vec<u8> {
        let hasher: &dyn Hasher = match hash_algorithm {
            HashAlgorithm::Sha256 => &SHA256,
            HashAlgorithm::Sha384 => &SHA384,
            HashAlgorithm::Sha512 => &SHA512,
        };
        let digest = hasher.hash(data_to_be_signed).unwrap();

        ECDSASigner::default()
            .sign(&digest, &self.public, &self.private)
            .unwrap()
    }

    /// Detached container built remotely from the content digest
    pub fn cms_signed_data(&self, content: &[u8], parameters: AlgorithmParameters) -> Vec<u8> {
        let codec = codec();
        let context = self.context(AlgorithmParameters {
            packaging: SignaturePackaging::Detached,
            ..parameters
        });

        let data_to_be_signed = codec.data_to_be_signed(content, &context).unwrap();
        let value = self.sign(&data_to_be_signed, parameters.hash_algorithm);

        codec
            .incorporate(
                content,
                &context,
                &SignatureInput::Value {
                    value,
                    timestamp: None,
                },
            )
            .unwrap()
    }
}
