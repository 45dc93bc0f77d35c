use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_with::{Bytes, serde_as};

use crate::model::algorithm::{HashAlgorithm, SignatureAlgorithm, SignaturePackaging};
use crate::model::transaction::ValidationData;
use crate::provider::crypto_codec::CodecError;

pub(super) const CONTAINER_VERSION: u8 = 1;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct SignedAttributes {
    #[serde_as(as = "Bytes")]
    pub content_digest: Vec<u8>,
    pub hash_algorithm: HashAlgorithm,
    pub signature_algorithm: SignatureAlgorithm,
    #[serde_as(as = "Option<Bytes>")]
    pub signing_certificate_digest: Option<Vec<u8>>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct SignerInfo {
    pub signed_attributes: SignedAttributes,
    #[serde_as(as = "Bytes")]
    pub signature_value: Vec<u8>,
    #[serde_as(as = "Option<Bytes>")]
    pub signing_certificate: Option<Vec<u8>>,
    #[serde_as(as = "Option<Bytes>")]
    pub timestamp: Option<Vec<u8>>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct ValidationMaterial {
    #[serde_as(as = "BTreeSet<Bytes>")]
    pub certificates: BTreeSet<Vec<u8>>,
    #[serde_as(as = "BTreeSet<Bytes>")]
    pub ocsp: BTreeSet<Vec<u8>>,
    #[serde_as(as = "BTreeSet<Bytes>")]
    pub crl: BTreeSet<Vec<u8>>,
}

impl ValidationMaterial {
    pub fn merge(&mut self, data: &ValidationData) {
        self.certificates
            .extend(data.certificate_chain.iter().cloned());
        self.ocsp.extend(data.ocsp.iter().cloned());
        self.crl.extend(data.crl.iter().cloned());
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct SignatureContainer {
    pub version: u8,
    pub packaging: SignaturePackaging,
    /// Present for enveloping containers only
    #[serde_as(as = "Option<Bytes>")]
    pub content: Option<Vec<u8>>,
    pub signer_infos: Vec<SignerInfo>,
    #[serde(default)]
    pub validation_material: ValidationMaterial,
}

/// Copy of the original document together with its signatures
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct EnvelopedDocument {
    #[serde_as(as = "Bytes")]
    pub document: Vec<u8>,
    pub signatures: Vec<SignatureContainer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) enum Envelope {
    Container(SignatureContainer),
    Document(EnvelopedDocument),
}

pub(super) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer).map_err(|e| CodecError::Encoding(e.to_string()))?;
    Ok(buffer)
}

pub(super) fn decode_envelope(bytes: &[u8]) -> Result<Envelope, CodecError> {
    ciborium::from_reader(bytes).map_err(|e| CodecError::Decoding(e.to_string()))
}
