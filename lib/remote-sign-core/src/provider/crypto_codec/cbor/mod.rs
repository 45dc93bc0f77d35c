//! Reference [`CryptoCodec`] encoding signatures into a CBOR container.
//!
//! Only ECDSA on P-256 is verified; RSA families are reported as unsupported.

use std::sync::Arc;

use remote_sign_crypto::signer::ecdsa::{ECDSA_ID, PLAIN_ECDSA_ID};
use remote_sign_crypto::{CryptoProvider, SignerError};

use super::model::{Indication, SignatureInput, SigningContext};
use super::{CodecError, CryptoCodec};
use crate::model::algorithm::{
    EncryptionAlgorithm, HashAlgorithm, SignatureAlgorithm, SignaturePackaging,
};
use crate::model::transaction::ValidationData;

mod container;

use container::{
    CONTAINER_VERSION, Envelope, EnvelopedDocument, SignatureContainer, SignedAttributes,
    SignerInfo, ValidationMaterial, decode_envelope, encode,
};

pub struct CborContainerCodec {
    crypto: Arc<dyn CryptoProvider>,
}

impl CborContainerCodec {
    pub fn new(crypto: Arc<dyn CryptoProvider>) -> Self {
        Self { crypto }
    }

    fn signed_attributes(
        &self,
        content: &[u8],
        context: &SigningContext,
    ) -> Result<SignedAttributes, CodecError> {
        let hash_algorithm = context.parameters.hash_algorithm;

        Ok(SignedAttributes {
            content_digest: self.digest(hash_algorithm, content)?,
            hash_algorithm,
            signature_algorithm: context.parameters.signature_algorithm,
            signing_certificate_digest: context
                .signing_certificate
                .as_ref()
                .map(|certificate| self.digest(hash_algorithm, certificate))
                .transpose()?,
        })
    }

    fn verify(
        &self,
        data_to_be_signed: &[u8],
        signature_value: &[u8],
        signature_algorithm: SignatureAlgorithm,
        certificate: &[u8],
    ) -> Result<bool, CodecError> {
        let signer = self.crypto.get_signer(signer_id(signature_algorithm)?)?;
        let public_key = public_key(certificate);
        let digest = self.digest(signature_algorithm.hash_algorithm(), data_to_be_signed)?;

        match signer.verify(&digest, signature_value, &public_key) {
            Ok(()) => Ok(true),
            Err(SignerError::InvalidSignature | SignerError::CouldNotVerify(_)) => Ok(false),
            Err(error) => Err(CodecError::InvalidCertificate(error.to_string())),
        }
    }

    fn validate_container(
        &self,
        container: &SignatureContainer,
        content: &[u8],
    ) -> Result<Indication, CodecError> {
        if container
            .content
            .as_ref()
            .is_some_and(|embedded| embedded != content)
        {
            return Ok(Indication::TotalFailed);
        }

        let mut result = None;
        for signer_info in &container.signer_infos {
            let indication = self.validate_signer_info(signer_info, content)?;
            result = Some(worst(result, indication));
        }

        Ok(result.unwrap_or(Indication::NoSignatureFound))
    }

    fn validate_signer_info(
        &self,
        signer_info: &SignerInfo,
        content: &[u8],
    ) -> Result<Indication, CodecError> {
        let attributes = &signer_info.signed_attributes;

        if attributes.hash_algorithm != attributes.signature_algorithm.hash_algorithm() {
            return Ok(Indication::Failed);
        }

        if self.digest(attributes.hash_algorithm, content)? != attributes.content_digest {
            return Ok(Indication::TotalFailed);
        }

        let Some(certificate) = &signer_info.signing_certificate else {
            return Ok(Indication::Indeterminate);
        };

        if let Some(certificate_digest) = &attributes.signing_certificate_digest {
            if &self.digest(attributes.hash_algorithm, certificate)? != certificate_digest {
                return Ok(Indication::Failed);
            }
        }

        let valid = self.verify(
            &encode(attributes)?,
            &signer_info.signature_value,
            attributes.signature_algorithm,
            certificate,
        )?;

        Ok(if valid {
            Indication::Ok
        } else {
            Indication::TotalFailed
        })
    }
}

impl CryptoCodec for CborContainerCodec {
    fn digest(&self, hash_algorithm: HashAlgorithm, content: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.crypto
            .get_hasher(hash_algorithm.hasher_id())?
            .hash(content)
            .map_err(|e| CodecError::Digest(hash_algorithm, e.to_string()))
    }

    fn data_to_be_signed(
        &self,
        content: &[u8],
        context: &SigningContext,
    ) -> Result<Vec<u8>, CodecError> {
        encode(&self.signed_attributes(content, context)?)
    }

    fn is_valid_signature_value(
        &self,
        data_to_be_signed: &[u8],
        signature_value: &[u8],
        context: &SigningContext,
    ) -> Result<bool, CodecError> {
        let certificate = context
            .signing_certificate
            .as_ref()
            .ok_or(CodecError::MissingSigningCertificate)?;

        self.verify(
            data_to_be_signed,
            signature_value,
            context.parameters.signature_algorithm,
            certificate,
        )
    }

    fn incorporate(
        &self,
        content: &[u8],
        context: &SigningContext,
        input: &SignatureInput,
    ) -> Result<Vec<u8>, CodecError> {
        let packaging = context.parameters.packaging;

        let container = match input {
            SignatureInput::Value { value, timestamp } => SignatureContainer {
                version: CONTAINER_VERSION,
                packaging,
                content: (packaging == SignaturePackaging::Enveloping).then(|| content.to_vec()),
                signer_infos: vec![SignerInfo {
                    signed_attributes: self.signed_attributes(content, context)?,
                    signature_value: value.to_owned(),
                    signing_certificate: context.signing_certificate.to_owned(),
                    timestamp: timestamp.to_owned(),
                }],
                validation_material: ValidationMaterial::default(),
            },
            SignatureInput::CmsSignedData(cms) => match decode_envelope(cms)? {
                Envelope::Container(container) => container,
                Envelope::Document(_) => {
                    return Err(CodecError::Decoding(
                        "expected a signature container, got a signed document".to_string(),
                    ));
                }
            },
        };

        let envelope = match packaging {
            SignaturePackaging::Enveloped => Envelope::Document(EnvelopedDocument {
                document: content.to_vec(),
                signatures: vec![container],
            }),
            SignaturePackaging::Detached | SignaturePackaging::Enveloping => {
                Envelope::Container(container)
            }
        };

        encode(&envelope)
    }

    fn extend_with_validation_data(
        &self,
        signed: &[u8],
        validation_data: &ValidationData,
    ) -> Result<Vec<u8>, CodecError> {
        let envelope = match decode_envelope(signed)? {
            Envelope::Container(mut container) => {
                container.validation_material.merge(validation_data);
                Envelope::Container(container)
            }
            Envelope::Document(mut document) => {
                document
                    .signatures
                    .iter_mut()
                    .for_each(|container| container.validation_material.merge(validation_data));
                Envelope::Document(document)
            }
        };

        encode(&envelope)
    }

    fn validate(&self, original: &[u8], signed: &[u8]) -> Result<Indication, CodecError> {
        let Ok(envelope) = decode_envelope(signed) else {
            return Ok(Indication::NoSignatureFound);
        };

        match envelope {
            Envelope::Container(container) => self.validate_container(&container, original),
            Envelope::Document(document) => {
                if document.document != original {
                    return Ok(Indication::TotalFailed);
                }

                let mut result = None;
                for container in &document.signatures {
                    let indication = self.validate_container(container, &document.document)?;
                    result = Some(worst(result, indication));
                }

                Ok(result.unwrap_or(Indication::NoSignatureFound))
            }
        }
    }
}

fn signer_id(signature_algorithm: SignatureAlgorithm) -> Result<&'static str, CodecError> {
    match signature_algorithm.encryption_algorithm() {
        EncryptionAlgorithm::Ecdsa => Ok(ECDSA_ID),
        EncryptionAlgorithm::PlainEcdsa => Ok(PLAIN_ECDSA_ID),
        EncryptionAlgorithm::RsassaPss => {
            Err(CodecError::UnsupportedAlgorithm(signature_algorithm))
        }
    }
}

/// Subject public key of a DER certificate, otherwise the bytes themselves
fn public_key(certificate: &[u8]) -> Vec<u8> {
    match x509_parser::parse_x509_certificate(certificate) {
        Ok((_, parsed)) => parsed.public_key().subject_public_key.data.to_vec(),
        Err(_) => certificate.to_vec(),
    }
}

fn worst(current: Option<Indication>, next: Indication) -> Indication {
    fn severity(indication: Indication) -> u8 {
        match indication {
            Indication::Ok => 0,
            Indication::Indeterminate => 1,
            Indication::Failed => 2,
            Indication::NoSignatureFound => 3,
            Indication::TotalFailed => 4,
        }
    }

    match current {
        Some(current) if severity(current) >= severity(next) => current,
        _ => next,
    }
}

#[cfg(test)]
mod test;
