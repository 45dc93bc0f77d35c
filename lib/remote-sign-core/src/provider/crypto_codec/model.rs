use strum::Display;

use crate::model::algorithm::AlgorithmParameters;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub parameters: AlgorithmParameters,
    /// DER X.509 certificate or raw SEC1 public key
    pub signing_certificate: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureInput {
    Value {
        value: Vec<u8>,
        timestamp: Option<Vec<u8>>,
    },
    CmsSignedData(Vec<u8>),
}

/// Main validation indication
#[derive(Debug, Copy, Clone, Display, PartialEq, Eq, Hash)]
pub enum Indication {
    #[strum(serialize = "TOTAL_PASSED")]
    Ok,
    #[strum(serialize = "INDETERMINATE")]
    Indeterminate,
    #[strum(serialize = "FAILED")]
    Failed,
    #[strum(serialize = "TOTAL_FAILED")]
    TotalFailed,
    #[strum(serialize = "NO_SIGNATURE_FOUND")]
    NoSignatureFound,
}

impl Indication {
    pub fn is_valid(&self) -> bool {
        !matches!(
            self,
            Self::Failed | Self::TotalFailed | Self::NoSignatureFound
        )
    }
}
