use itertools::Itertools;

use super::dto::{
    CertificateDTO, CmsSignedDataDTO, CreateTransactionRequestDTO, DocumentHashDTO,
    DocumentRevisionDTO, DocumentToBeSignedDTO, IdentificationDocumentDTO, SealDTO,
    SignatureParameterDTO, SignatureValueDTO, ToBeSignedDTO, ToBeSignedResultsDTO,
    TransactionResponseDTO, TransactionStateDTO, UserDTO, UserStateDTO,
    ValidationRelatedInformationDTO,
};
use crate::model::transaction::{
    Challenge, TargetKind, TransactionState, TransactionTarget, ValidationData,
};
use crate::model::unit::{ContentKind, RawPayload, RawResult, ResultKey, UnitContent};
use crate::provider::gateway::GatewayError;
use crate::provider::gateway::model::{
    CreateTransactionRequest, IdentificationDocument, Seal, SigningCertificate,
    TransactionSnapshot, User, UserState,
};

pub(super) fn create_request_to_dto(
    request: &CreateTransactionRequest,
) -> Result<CreateTransactionRequestDTO, GatewayError> {
    let parameters = &request.parameters;

    let mut dto = match &request.target {
        TransactionTarget::Sign { user_id, options } => CreateTransactionRequestDTO {
            user_id: Some(user_id.to_owned()),
            redirect_after_page_visit_url: options.redirect_after_page_visit_url.to_owned(),
            confirms_identity: Some(options.confirms_identity),
            certificate_id: options.certificate_id,
            ..Default::default()
        },
        TransactionTarget::Seal { seal_id } => CreateTransactionRequestDTO {
            seal_id: Some(seal_id.to_owned()),
            ..Default::default()
        },
    };

    let mut signature_parameter = SignatureParameterDTO {
        signature_niveau: parameters.niveau,
        signature_level: Some(parameters.level),
        hash_algorithm: parameters.hash_algorithm,
        signature_algorithm: None,
        signature_format: None,
        signature_packaging: None,
    };

    match request.kind {
        ContentKind::ToBeSigned => {
            signature_parameter.signature_algorithm = Some(parameters.signature_algorithm);
            dto.to_be_signed = Some(
                request
                    .units
                    .iter()
                    .map(|unit| match &unit.content {
                        UnitContent::ToBeSigned(data) => Ok(ToBeSignedDTO {
                            id: unit.id(),
                            to_be_signed_data: data.to_owned(),
                            origins_from: unit.metadata.origin.to_owned(),
                        }),
                        other => Err(mixed_batch(other.kind(), request.kind)),
                    })
                    .try_collect()?,
            );
        }
        ContentKind::DocumentHash => {
            signature_parameter.signature_format = Some(parameters.format);
            signature_parameter.signature_packaging = Some(parameters.packaging);
            dto.timestamp_provider = request.timestamp_provider.to_owned();
            dto.document_hashes = Some(
                request
                    .units
                    .iter()
                    .map(|unit| match &unit.content {
                        UnitContent::DocumentHash(hash) => Ok(DocumentHashDTO {
                            id: unit.id(),
                            hash: hash.to_owned(),
                        }),
                        other => Err(mixed_batch(other.kind(), request.kind)),
                    })
                    .try_collect()?,
            );
        }
        ContentKind::Document => {
            dto.documents = Some(
                request
                    .units
                    .iter()
                    .map(|unit| match &unit.content {
                        UnitContent::Document(document_id) => Ok(DocumentToBeSignedDTO {
                            document_id: *document_id,
                            signature_format: parameters.format,
                            signature_packaging: parameters.packaging,
                            visual_parameter: unit.metadata.visual.to_owned(),
                        }),
                        other => Err(mixed_batch(other.kind(), request.kind)),
                    })
                    .try_collect()?,
            );
        }
    }

    dto.signature_parameter = Some(signature_parameter);
    Ok(dto)
}

fn mixed_batch(unit: ContentKind, request: ContentKind) -> GatewayError {
    GatewayError::MappingError(format!("`{unit}` unit in `{request}` transaction"))
}

/// Seal transactions complete synchronously and carry no state
pub(super) fn snapshot_from_dto<R>(
    dto: TransactionResponseDTO<R>,
    target: TargetKind,
    map_results: impl FnOnce(R) -> (Vec<RawResult>, Option<ValidationData>),
) -> Result<TransactionSnapshot, GatewayError> {
    let (state, challenge) = match (target, dto.state) {
        (TargetKind::Seal, _) | (TargetKind::Sign, Some(TransactionStateDTO::Finished)) => {
            (TransactionState::Finished, None)
        }
        (TargetKind::Sign, Some(TransactionStateDTO::TanRequired)) => (
            TransactionState::TanRequired,
            Some(Challenge::Tan {
                sent_to: dto.tan_send_to,
            }),
        ),
        (TargetKind::Sign, Some(TransactionStateDTO::PageVisitRequired)) => {
            let url = dto.page_visit_url.ok_or_else(|| {
                GatewayError::MappingError("page visit required without pageVisitUrl".to_string())
            })?;
            (
                TransactionState::PageVisitRequired,
                Some(Challenge::PageVisit { url }),
            )
        }
        (TargetKind::Sign, None) => {
            return Err(GatewayError::MappingError(
                "sign transaction without state".to_string(),
            ));
        }
    };

    let (results, validation_data) = match (state, dto.results) {
        (TransactionState::Finished, Some(results)) => map_results(results),
        _ => (vec![], None),
    };

    Ok(TransactionSnapshot {
        id: dto.id,
        state,
        challenge,
        results,
        validation_data,
    })
}

pub(super) fn to_be_signed_results(
    results: ToBeSignedResultsDTO,
) -> (Vec<RawResult>, Option<ValidationData>) {
    (
        results.values.into_iter().map(signature_value).collect(),
        results.validation_related_information.map(Into::into),
    )
}

fn signature_value(value: SignatureValueDTO) -> RawResult {
    RawResult {
        key: ResultKey::Unit(value.id),
        payload: RawPayload::SignatureValue {
            value: value.signature_value,
            timestamp: value.timestamp,
        },
    }
}

pub(super) fn cms_results(results: Vec<CmsSignedDataDTO>) -> (Vec<RawResult>, Option<ValidationData>) {
    let results = results
        .into_iter()
        .map(|result| RawResult {
            key: ResultKey::Unit(result.id),
            payload: RawPayload::CmsSignedData(result.cms_signed_data),
        })
        .collect();

    (results, None)
}

pub(super) fn revision_results(
    results: Vec<DocumentRevisionDTO>,
) -> (Vec<RawResult>, Option<ValidationData>) {
    let results = results
        .into_iter()
        .map(|result| RawResult {
            key: ResultKey::Document(result.document_id),
            payload: RawPayload::DocumentRevision { href: result.href },
        })
        .collect();

    (results, None)
}

impl From<ValidationRelatedInformationDTO> for ValidationData {
    fn from(value: ValidationRelatedInformationDTO) -> Self {
        Self {
            certificate_chain: value.certificate_chain,
            ocsp: value.ocsp,
            crl: value.crl,
        }
    }
}

impl From<SealDTO> for Seal {
    fn from(value: SealDTO) -> Self {
        Self {
            seal_id: value.seal_id,
            organization: value.organization,
            organization_unit: value.organization_unit,
            valid_until: value.valid_until,
            error: value.error,
        }
    }
}

impl From<CertificateDTO> for SigningCertificate {
    fn from(value: CertificateDTO) -> Self {
        Self {
            id: value.certificate_id,
            certificate: value.certificate,
            niveau: value.signature_niveau,
            signature_algorithms: value.signature_algorithms,
        }
    }
}

impl From<UserStateDTO> for UserState {
    fn from(value: UserStateDTO) -> Self {
        match value {
            UserStateDTO::NotRegistered => Self::NotRegistered,
            UserStateDTO::NotReady => Self::NotReady,
            UserStateDTO::Ready => Self::Ready,
        }
    }
}

impl From<IdentificationDocumentDTO> for IdentificationDocument {
    fn from(value: IdentificationDocumentDTO) -> Self {
        Self {
            given_name: value.given_name,
            family_name: value.family_name,
            birth_date: value.birth_date,
            address_line: value.address_line,
            city_line: value.city_line,
            country_code_iso2: value.country_code_iso2,
            expires_on: value.expires_on,
        }
    }
}

impl From<UserDTO> for User {
    fn from(value: UserDTO) -> Self {
        Self {
            state: value.state.into(),
            needs_recurring_confirmation_of_identity: value
                .needs_recurring_confirmation_of_identity
                .unwrap_or_default(),
            identification_document: value.identification_document.map(Into::into),
        }
    }
}
