//! Turns raw provider results into validated signature artifacts

use std::sync::Arc;

use shared_types::UnitId;
use thiserror::Error;

use crate::model::artifact::FinalArtifact;
use crate::model::transaction::ValidationData;
use crate::model::unit::{RawPayload, RawResult};
use crate::provider::crypto_codec::model::{Indication, SignatureInput, SigningContext};
use crate::provider::crypto_codec::{CodecError, CryptoCodec};

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Signature value of unit `{0}` does not match the local digest")]
    DigestMismatch(UnitId),
    #[error("Signature of unit `{unit_id}` is invalid: `{indication}`")]
    ValidationFailed {
        unit_id: UnitId,
        indication: Indication,
    },
    #[error("Signed revision of unit `{0}` was not downloaded")]
    UnresolvedRevision(UnitId),
    #[error("Signature value of unit `{0}` carries no timestamp required by its level")]
    MissingTimestamp(UnitId),
    #[error("No validation data available to extend unit `{0}`")]
    MissingValidationData(UnitId),
    #[error("Codec error: `{0}`")]
    Codec(#[from] CodecError),
}

#[derive(Clone)]
pub struct SignatureAssembler {
    codec: Arc<dyn CryptoCodec>,
}

impl SignatureAssembler {
    pub fn new(codec: Arc<dyn CryptoCodec>) -> Self {
        Self { codec }
    }

    /// Builds the artifact of one unit and validates it against `original`.
    ///
    /// `validation_data` is only used for long-term levels and falls back to the
    /// signing certificate.
    pub fn assemble(
        &self,
        unit_id: UnitId,
        original: &[u8],
        context: &SigningContext,
        result: &RawResult,
        validation_data: Option<&ValidationData>,
    ) -> Result<FinalArtifact, AssemblyError> {
        let parameters = &context.parameters;

        let signed = match &result.payload {
            RawPayload::SignatureValue { value, timestamp } => {
                if timestamp.is_none() && parameters.level.requires_timestamp() {
                    return Err(AssemblyError::MissingTimestamp(unit_id));
                }
                if context.signing_certificate.is_some() {
                    let data_to_be_signed = self.codec.data_to_be_signed(original, context)?;
                    if !self
                        .codec
                        .is_valid_signature_value(&data_to_be_signed, value, context)?
                    {
                        return Err(AssemblyError::DigestMismatch(unit_id));
                    }
                }

                self.codec.incorporate(
                    original,
                    context,
                    &SignatureInput::Value {
                        value: value.to_owned(),
                        timestamp: timestamp.to_owned(),
                    },
                )?
            }
            RawPayload::CmsSignedData(cms) => self.codec.incorporate(
                original,
                context,
                &SignatureInput::CmsSignedData(cms.to_owned()),
            )?,
            RawPayload::SignedDocument(document) => document.to_owned(),
            RawPayload::DocumentRevision { .. } => {
                return Err(AssemblyError::UnresolvedRevision(unit_id));
            }
        };

        let extended = parameters.level.requires_validation_data();
        let signed = if extended {
            let fallback = context
                .signing_certificate
                .as_ref()
                .map(|certificate| ValidationData {
                    certificate_chain: vec![certificate.to_owned()],
                    ..Default::default()
                });

            let validation_data = validation_data
                .filter(|data| !data.is_empty())
                .or(fallback.as_ref())
                .ok_or(AssemblyError::MissingValidationData(unit_id))?;

            self.codec
                .extend_with_validation_data(&signed, validation_data)?
        } else {
            signed
        };

        let indication = self.codec.validate(original, &signed)?;
        if !indication.is_valid() {
            tracing::error!("Validation of unit {unit_id} failed: {indication}");
            return Err(AssemblyError::ValidationFailed {
                unit_id,
                indication,
            });
        }
        if indication == Indication::Indeterminate {
            tracing::warn!("Validation of unit {unit_id} is indeterminate");
        }

        Ok(FinalArtifact {
            unit_id,
            packaging: parameters.packaging,
            bytes: signed,
            indication,
            extended,
        })
    }
}
