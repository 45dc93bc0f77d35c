use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::{serde_as, skip_serializing_none};
use shared_types::{CertificateId, DocumentId, TransactionId, UnitId};
use url::Url;

use crate::model::algorithm::{
    HashAlgorithm, SignatureAlgorithm, SignatureFormat, SignatureLevel, SignatureNiveau,
    SignaturePackaging,
};
use crate::model::unit::VisualParameters;

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignatureParameterDTO {
    pub signature_niveau: SignatureNiveau,
    pub signature_level: Option<SignatureLevel>,
    pub hash_algorithm: HashAlgorithm,
    pub signature_algorithm: Option<SignatureAlgorithm>,
    pub signature_format: Option<SignatureFormat>,
    pub signature_packaging: Option<SignaturePackaging>,
}

#[serde_as]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DocumentHashDTO {
    pub id: UnitId,
    #[serde_as(as = "Base64")]
    pub hash: Vec<u8>,
}

#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ToBeSignedDTO {
    pub id: UnitId,
    #[serde_as(as = "Base64")]
    pub to_be_signed_data: Vec<u8>,
    pub origins_from: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DocumentToBeSignedDTO {
    pub document_id: DocumentId,
    pub signature_format: SignatureFormat,
    pub signature_packaging: SignaturePackaging,
    pub visual_parameter: Option<VisualParameters>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateTransactionRequestDTO {
    pub user_id: Option<String>,
    pub seal_id: Option<String>,
    pub signature_parameter: Option<SignatureParameterDTO>,
    pub redirect_after_page_visit_url: Option<Url>,
    pub confirms_identity: Option<bool>,
    pub certificate_id: Option<CertificateId>,
    pub timestamp_provider: Option<String>,
    pub document_hashes: Option<Vec<DocumentHashDTO>>,
    pub to_be_signed: Option<Vec<ToBeSignedDTO>>,
    pub documents: Option<Vec<DocumentToBeSignedDTO>>,
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct TanAuthorizeRequestDTO<'a> {
    pub tan: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(super) enum TransactionStateDTO {
    Finished,
    TanRequired,
    PageVisitRequired,
}

/// Response of every transaction route, `state` is absent for seals
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TransactionResponseDTO<R> {
    pub id: TransactionId,
    #[serde(default)]
    pub state: Option<TransactionStateDTO>,
    #[serde(default)]
    pub page_visit_url: Option<Url>,
    #[serde(default)]
    pub tan_send_to: Option<String>,
    pub results: Option<R>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignatureValueDTO {
    pub id: UnitId,
    #[serde_as(as = "Base64")]
    pub signature_value: Vec<u8>,
    #[serde_as(as = "Option<Base64>")]
    #[serde(default)]
    pub timestamp: Option<Vec<u8>>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValidationRelatedInformationDTO {
    #[serde_as(as = "Vec<Base64>")]
    #[serde(default)]
    pub certificate_chain: Vec<Vec<u8>>,
    #[serde_as(as = "Vec<Base64>")]
    #[serde(default)]
    pub ocsp: Vec<Vec<u8>>,
    #[serde_as(as = "Vec<Base64>")]
    #[serde(default)]
    pub crl: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ToBeSignedResultsDTO {
    pub values: Vec<SignatureValueDTO>,
    #[serde(default)]
    pub validation_related_information: Option<ValidationRelatedInformationDTO>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CmsSignedDataDTO {
    pub id: UnitId,
    #[serde_as(as = "Base64")]
    pub cms_signed_data: Vec<u8>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DocumentRevisionDTO {
    pub document_id: DocumentId,
    pub href: Url,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AvailableSealsDTO {
    pub seals: Vec<SealDTO>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SealDTO {
    pub seal_id: String,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
    pub valid_until: Option<String>,
    pub error: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CertificateDTO {
    #[serde(default)]
    pub certificate_id: Option<CertificateId>,
    #[serde_as(as = "Base64")]
    pub certificate: Vec<u8>,
    pub signature_niveau: SignatureNiveau,
    pub signature_algorithms: Vec<SignatureAlgorithm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(super) enum UserStateDTO {
    NotRegistered,
    NotReady,
    Ready,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDTO {
    pub state: UserStateDTO,
    #[serde(default)]
    pub needs_recurring_confirmation_of_identity: Option<bool>,
    #[serde(default)]
    pub identification_document: Option<IdentificationDocumentDTO>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserStateResponseDTO {
    pub state: UserStateDTO,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IdentificationDocumentDTO {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub birth_date: Option<String>,
    pub address_line: Option<String>,
    pub city_line: Option<String>,
    pub country_code_iso2: Option<String>,
    pub expires_on: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DigestDTO {
    pub id: UnitId,
    pub hash_algorithm: HashAlgorithm,
    #[serde_as(as = "Base64")]
    pub digest: Vec<u8>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TimestampRequestDTO<'a> {
    pub timestamp_provider: &'a str,
    pub digests: Vec<DigestDTO>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TimestampsDTO {
    pub timestamps: Vec<TimestampTokenDTO>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TimestampTokenDTO {
    pub id: UnitId,
    #[serde_as(as = "Base64")]
    pub timestamp_token: Vec<u8>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadedDocumentDTO {
    pub document_id: DocumentId,
}
