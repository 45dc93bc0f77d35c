use shared_types::{CertificateId, TransactionId, UnitId};

use crate::model::algorithm::{
    AlgorithmParameters, HashAlgorithm, SignatureAlgorithm, SignatureNiveau,
};
use crate::model::transaction::{Challenge, TransactionState, TransactionTarget, ValidationData};
use crate::model::unit::{ContentKind, RawResult, SignableUnit};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionRequest {
    pub target: TransactionTarget,
    pub kind: ContentKind,
    pub parameters: AlgorithmParameters,
    pub units: Vec<SignableUnit>,
    /// Provider timestamps the signatures of document hashes itself
    pub timestamp_provider: Option<String>,
}

/// Provider view of a transaction at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSnapshot {
    pub id: TransactionId,
    pub state: TransactionState,
    pub challenge: Option<Challenge>,
    pub results: Vec<RawResult>,
    pub validation_data: Option<ValidationData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seal {
    pub seal_id: String,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
    pub valid_until: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCertificate {
    /// Only set for certificates of stored-keys users
    pub id: Option<CertificateId>,
    /// DER encoded
    pub certificate: Vec<u8>,
    pub niveau: SignatureNiveau,
    pub signature_algorithms: Vec<SignatureAlgorithm>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum UserState {
    #[strum(serialize = "NOT_REGISTERED")]
    NotRegistered,
    #[strum(serialize = "NOT_READY")]
    NotReady,
    #[strum(serialize = "READY")]
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub state: UserState,
    pub needs_recurring_confirmation_of_identity: bool,
    pub identification_document: Option<IdentificationDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentificationDocument {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub birth_date: Option<String>,
    pub address_line: Option<String>,
    pub city_line: Option<String>,
    pub country_code_iso2: Option<String>,
    pub expires_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestToTimestamp {
    pub id: UnitId,
    pub hash_algorithm: HashAlgorithm,
    pub digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampToken {
    pub id: UnitId,
    pub token: Vec<u8>,
}
