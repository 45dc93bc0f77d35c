use shared_types::{CertificateId, TransactionId};
use url::Url;

use crate::model::algorithm::{
    AlgorithmParameters, HashAlgorithm, Provider, SignatureAlgorithm, SignatureNiveau,
    SignatureProfile,
};
use crate::model::artifact::FinalArtifact;
use crate::model::transaction::TargetKind;
use crate::model::unit::{ContentKind, VisualParameters};

#[derive(Debug, Clone, PartialEq)]
pub enum SignerDTO {
    User {
        user_id: String,
        certificate_id: Option<CertificateId>,
        redirect_after_page_visit_url: Option<Url>,
    },
    Seal {
        seal_id: String,
    },
}

impl SignerDTO {
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Self::User { .. } => TargetKind::Sign,
            Self::Seal { .. } => TargetKind::Seal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SigningInputDTO {
    pub content: Vec<u8>,
    /// Filename the content was read from
    pub origin: Option<String>,
    pub visual: Option<VisualParameters>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SigningRequestDTO {
    pub provider: Provider,
    pub signer: SignerDTO,
    /// How the inputs are handed to the provider
    pub kind: ContentKind,
    pub niveau: SignatureNiveau,
    pub hash_algorithm: Option<HashAlgorithm>,
    pub signature_algorithm: Option<SignatureAlgorithm>,
    pub profile: SignatureProfile,
    pub inputs: Vec<SigningInputDTO>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SigningResultDTO {
    pub transaction_id: TransactionId,
    pub parameters: AlgorithmParameters,
    /// One artifact per input, in input order
    pub artifacts: Vec<FinalArtifact>,
}
