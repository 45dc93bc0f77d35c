use shared_types::UnitId;

use crate::model::algorithm::SignaturePackaging;
use crate::provider::crypto_codec::model::Indication;

/// Assembled and validated signature for one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalArtifact {
    pub unit_id: UnitId,
    pub packaging: SignaturePackaging,
    /// Detached or enveloping container, or the signed document
    pub bytes: Vec<u8>,
    pub indication: Indication,
    pub extended: bool,
}
