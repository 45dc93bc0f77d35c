use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_types::{CertificateId, TransactionId, UnitId};
use strum::{AsRefStr, Display};
use url::Url;

use super::algorithm::{AlgorithmParameters, Provider};
use super::unit::{ContentKind, RawResult, SignableUnit};

#[derive(Debug, Copy, Clone, Display, AsRefStr, PartialEq, Eq, Hash)]
pub enum TargetKind {
    #[strum(serialize = "sign")]
    Sign,
    #[strum(serialize = "seal")]
    Seal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// The user confirmed the identity document shown to them
    pub confirms_identity: bool,
    pub redirect_after_page_visit_url: Option<Url>,
    pub certificate_id: Option<CertificateId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionTarget {
    Sign {
        user_id: String,
        options: SignOptions,
    },
    Seal {
        seal_id: String,
    },
}

impl TransactionTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Sign { .. } => TargetKind::Sign,
            Self::Seal { .. } => TargetKind::Seal,
        }
    }
}

/// Everything needed to address a transaction at the gateway
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransactionAddress {
    pub target: TargetKind,
    pub kind: ContentKind,
    pub id: TransactionId,
}

#[derive(Debug, Copy, Clone, Display, PartialEq, Eq, Hash)]
pub enum TransactionState {
    #[strum(serialize = "SUBMITTED")]
    Submitted,
    #[strum(serialize = "TAN_REQUIRED")]
    TanRequired,
    #[strum(serialize = "PAGE_VISIT_REQUIRED")]
    PageVisitRequired,
    #[strum(serialize = "FINISHED")]
    Finished,
    #[strum(serialize = "FAILED")]
    Failed,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

/// Second factor requested by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    Tan { sent_to: Option<String> },
    PageVisit { url: Url },
}

/// Revocation and chain material for long-term signatures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationData {
    pub certificate_chain: Vec<Vec<u8>>,
    pub ocsp: Vec<Vec<u8>>,
    pub crl: Vec<Vec<u8>>,
}

impl ValidationData {
    pub fn is_empty(&self) -> bool {
        self.certificate_chain.is_empty() && self.ocsp.is_empty() && self.crl.is_empty()
    }
}

/// A pending or completed remote signing transaction.
///
/// Only [`crate::service::transaction::TransactionService`] transitions the state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub(crate) id: TransactionId,
    pub(crate) provider: Provider,
    pub(crate) target: TransactionTarget,
    pub(crate) kind: ContentKind,
    pub(crate) parameters: AlgorithmParameters,
    pub(crate) state: TransactionState,
    pub(crate) challenge: Option<Challenge>,
    pub(crate) units: Vec<SignableUnit>,
    pub(crate) results: IndexMap<UnitId, RawResult>,
    pub(crate) validation_data: Option<ValidationData>,
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn target(&self) -> &TransactionTarget {
        &self.target
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn parameters(&self) -> &AlgorithmParameters {
        &self.parameters
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn units(&self) -> &[SignableUnit] {
        &self.units
    }

    /// Correlated results in batch order, empty until finished
    pub fn results(&self) -> &IndexMap<UnitId, RawResult> {
        &self.results
    }

    pub fn validation_data(&self) -> Option<&ValidationData> {
        self.validation_data.as_ref()
    }

    pub fn address(&self) -> TransactionAddress {
        TransactionAddress {
            target: self.target.kind(),
            kind: self.kind,
            id: self.id,
        }
    }
}
