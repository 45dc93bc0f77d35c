use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureNiveau {
    #[serde(rename = "ADVANCED")]
    #[strum(serialize = "ADVANCED")]
    Advanced,
    #[serde(rename = "QUALIFIED")]
    #[strum(serialize = "QUALIFIED")]
    Qualified,
}

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA_256")]
    #[strum(serialize = "SHA_256")]
    Sha256,
    #[serde(rename = "SHA_384")]
    #[strum(serialize = "SHA_384")]
    Sha384,
    #[serde(rename = "SHA_512")]
    #[strum(serialize = "SHA_512")]
    Sha512,
}

impl HashAlgorithm {
    /// Identifier of the matching hasher in [`remote_sign_crypto::CryptoProvider`]
    pub fn hasher_id(&self) -> &'static str {
        use remote_sign_crypto::hasher::sha;

        match self {
            Self::Sha256 => sha::SHA256_ID,
            Self::Sha384 => sha::SHA384_ID,
            Self::Sha512 => sha::SHA512_ID,
        }
    }

    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// Key family a signature algorithm belongs to
#[derive(Debug, Copy, Clone, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionAlgorithm {
    #[serde(rename = "RSASSA_PSS")]
    #[strum(serialize = "RSASSA_PSS")]
    RsassaPss,
    #[serde(rename = "ECDSA")]
    #[strum(serialize = "ECDSA")]
    Ecdsa,
    #[serde(rename = "PLAIN_ECDSA")]
    #[strum(serialize = "PLAIN_ECDSA")]
    PlainEcdsa,
}

impl EncryptionAlgorithm {
    /// ECDSA keys produce both DER and plain encoded values
    pub fn is_compatible_with(&self, other: &EncryptionAlgorithm) -> bool {
        matches!(
            (self, other),
            (Self::Ecdsa | Self::PlainEcdsa, Self::Ecdsa | Self::PlainEcdsa)
        ) || self == other
    }
}

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "RSA_SHA256")]
    #[strum(serialize = "RSA_SHA256")]
    RsaSha256,
    #[serde(rename = "RSA_SHA384")]
    #[strum(serialize = "RSA_SHA384")]
    RsaSha384,
    #[serde(rename = "RSA_SHA512")]
    #[strum(serialize = "RSA_SHA512")]
    RsaSha512,
    #[serde(rename = "RSA_WITH_MGF1_SHA256")]
    #[strum(serialize = "RSA_WITH_MGF1_SHA256")]
    RsaWithMgf1Sha256,
    #[serde(rename = "RSA_WITH_MGF1_SHA384")]
    #[strum(serialize = "RSA_WITH_MGF1_SHA384")]
    RsaWithMgf1Sha384,
    #[serde(rename = "RSA_WITH_MGF1_SHA512")]
    #[strum(serialize = "RSA_WITH_MGF1_SHA512")]
    RsaWithMgf1Sha512,
    #[serde(rename = "ECDSA_SHA256")]
    #[strum(serialize = "ECDSA_SHA256")]
    EcdsaSha256,
    #[serde(rename = "ECDSA_SHA384")]
    #[strum(serialize = "ECDSA_SHA384")]
    EcdsaSha384,
    #[serde(rename = "ECDSA_SHA512")]
    #[strum(serialize = "ECDSA_SHA512")]
    EcdsaSha512,
    #[serde(rename = "PLAIN_ECDSA_SHA256")]
    #[strum(serialize = "PLAIN_ECDSA_SHA256")]
    PlainEcdsaSha256,
    #[serde(rename = "PLAIN_ECDSA_SHA384")]
    #[strum(serialize = "PLAIN_ECDSA_SHA384")]
    PlainEcdsaSha384,
    #[serde(rename = "PLAIN_ECDSA_SHA512")]
    #[strum(serialize = "PLAIN_ECDSA_SHA512")]
    PlainEcdsaSha512,
}

impl SignatureAlgorithm {
    pub const ALL: [SignatureAlgorithm; 12] = [
        Self::RsaSha256,
        Self::RsaSha384,
        Self::RsaSha512,
        Self::RsaWithMgf1Sha256,
        Self::RsaWithMgf1Sha384,
        Self::RsaWithMgf1Sha512,
        Self::EcdsaSha256,
        Self::EcdsaSha384,
        Self::EcdsaSha512,
        Self::PlainEcdsaSha256,
        Self::PlainEcdsaSha384,
        Self::PlainEcdsaSha512,
    ];

    /// The single hash algorithm implied by the algorithm name
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            Self::RsaSha256
            | Self::RsaWithMgf1Sha256
            | Self::EcdsaSha256
            | Self::PlainEcdsaSha256 => HashAlgorithm::Sha256,
            Self::RsaSha384
            | Self::RsaWithMgf1Sha384
            | Self::EcdsaSha384
            | Self::PlainEcdsaSha384 => HashAlgorithm::Sha384,
            Self::RsaSha512
            | Self::RsaWithMgf1Sha512
            | Self::EcdsaSha512
            | Self::PlainEcdsaSha512 => HashAlgorithm::Sha512,
        }
    }

    pub fn encryption_algorithm(&self) -> EncryptionAlgorithm {
        match self {
            Self::RsaSha256
            | Self::RsaSha384
            | Self::RsaSha512
            | Self::RsaWithMgf1Sha256
            | Self::RsaWithMgf1Sha384
            | Self::RsaWithMgf1Sha512 => EncryptionAlgorithm::RsassaPss,
            Self::EcdsaSha256 | Self::EcdsaSha384 | Self::EcdsaSha512 => EncryptionAlgorithm::Ecdsa,
            Self::PlainEcdsaSha256 | Self::PlainEcdsaSha384 | Self::PlainEcdsaSha512 => {
                EncryptionAlgorithm::PlainEcdsa
            }
        }
    }

    /// Default algorithm of a key family, RSA keys sign with MGF1 padding
    pub fn from_parts(encryption: EncryptionAlgorithm, hash: HashAlgorithm) -> Self {
        match (encryption, hash) {
            (EncryptionAlgorithm::RsassaPss, HashAlgorithm::Sha256) => Self::RsaWithMgf1Sha256,
            (EncryptionAlgorithm::RsassaPss, HashAlgorithm::Sha384) => Self::RsaWithMgf1Sha384,
            (EncryptionAlgorithm::RsassaPss, HashAlgorithm::Sha512) => Self::RsaWithMgf1Sha512,
            (EncryptionAlgorithm::Ecdsa, HashAlgorithm::Sha256) => Self::EcdsaSha256,
            (EncryptionAlgorithm::Ecdsa, HashAlgorithm::Sha384) => Self::EcdsaSha384,
            (EncryptionAlgorithm::Ecdsa, HashAlgorithm::Sha512) => Self::EcdsaSha512,
            (EncryptionAlgorithm::PlainEcdsa, HashAlgorithm::Sha256) => Self::PlainEcdsaSha256,
            (EncryptionAlgorithm::PlainEcdsa, HashAlgorithm::Sha384) => Self::PlainEcdsaSha384,
            (EncryptionAlgorithm::PlainEcdsa, HashAlgorithm::Sha512) => Self::PlainEcdsaSha512,
        }
    }
}

#[derive(
    Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SignatureLevel {
    #[serde(rename = "B_B")]
    #[strum(serialize = "B_B")]
    BB,
    #[serde(rename = "B_T")]
    #[strum(serialize = "B_T")]
    BT,
    #[serde(rename = "B_LT")]
    #[strum(serialize = "B_LT")]
    BLt,
    #[serde(rename = "B_LTA")]
    #[strum(serialize = "B_LTA")]
    BLta,
}

impl SignatureLevel {
    pub fn requires_timestamp(&self) -> bool {
        *self >= Self::BT
    }

    pub fn requires_validation_data(&self) -> bool {
        *self >= Self::BLt
    }
}

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureFormat {
    #[serde(rename = "CADES")]
    #[strum(serialize = "CADES")]
    Cades,
    #[serde(rename = "PADES")]
    #[strum(serialize = "PADES")]
    Pades,
}

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignaturePackaging {
    #[serde(rename = "ENVELOPING")]
    #[strum(serialize = "ENVELOPING")]
    Enveloping,
    #[serde(rename = "ENVELOPED")]
    #[strum(serialize = "ENVELOPED")]
    Enveloped,
    #[serde(rename = "DETACHED")]
    #[strum(serialize = "DETACHED")]
    Detached,
}

/// Remote signing providers reachable through the gateway
#[derive(
    Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Provider {
    #[serde(rename = "BV")]
    #[strum(serialize = "BV")]
    Bv,
    #[serde(rename = "DTRUST")]
    #[strum(serialize = "DTRUST")]
    Dtrust,
    #[serde(rename = "STORED_KEYS")]
    #[strum(serialize = "STORED_KEYS")]
    StoredKeys,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProviderCapabilities {
    pub niveaus: &'static [SignatureNiveau],
    /// Family used when the caller does not name a signature algorithm
    pub encryption_algorithm: Option<EncryptionAlgorithm>,
    pub sign: bool,
    pub seal: bool,
}

impl Provider {
    pub fn capabilities(&self) -> ProviderCapabilities {
        match self {
            Self::Bv => ProviderCapabilities {
                niveaus: &[SignatureNiveau::Advanced, SignatureNiveau::Qualified],
                encryption_algorithm: Some(EncryptionAlgorithm::RsassaPss),
                sign: true,
                seal: true,
            },
            Self::Dtrust => ProviderCapabilities {
                niveaus: &[SignatureNiveau::Qualified],
                encryption_algorithm: Some(EncryptionAlgorithm::Ecdsa),
                sign: true,
                seal: true,
            },
            Self::StoredKeys => ProviderCapabilities {
                niveaus: &[SignatureNiveau::Advanced],
                encryption_algorithm: None,
                sign: true,
                seal: false,
            },
        }
    }
}

/// Level, format and packaging of the requested signature
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureProfile {
    pub level: SignatureLevel,
    pub format: SignatureFormat,
    pub packaging: SignaturePackaging,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmParameters {
    pub niveau: SignatureNiveau,
    pub hash_algorithm: HashAlgorithm,
    pub signature_algorithm: SignatureAlgorithm,
    pub encryption_algorithm: EncryptionAlgorithm,
    pub level: SignatureLevel,
    pub format: SignatureFormat,
    pub packaging: SignaturePackaging,
}
