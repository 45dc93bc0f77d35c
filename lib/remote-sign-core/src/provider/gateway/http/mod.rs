//! REST binding of [`SigningGateway`]

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use shared_types::DocumentId;
use url::Url;

use super::model::{
    CreateTransactionRequest, DigestToTimestamp, Seal, SigningCertificate, TimestampToken,
    TransactionSnapshot, User, UserState,
};
use super::{GatewayError, SigningGateway};
use crate::model::algorithm::Provider;
use crate::model::transaction::{TargetKind, TransactionAddress};
use crate::model::unit::ContentKind;
use crate::provider::http_client::{HttpClient, RequestBuilder, Response};
use crate::provider::oauth::AccessTokenProvider;

mod dto;
mod mapper;

use dto::{
    AvailableSealsDTO, CertificateDTO, CmsSignedDataDTO, DigestDTO, DocumentRevisionDTO,
    TanAuthorizeRequestDTO, TimestampRequestDTO, TimestampsDTO, ToBeSignedResultsDTO,
    TransactionResponseDTO, UploadedDocumentDTO, UserDTO, UserStateResponseDTO,
};
use mapper::{
    cms_results, create_request_to_dto, revision_results, snapshot_from_dto,
    to_be_signed_results,
};

const PROVIDER_HEADER: &str = "provider";

pub struct HttpSigningGateway {
    client: Arc<dyn HttpClient>,
    token_provider: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl HttpSigningGateway {
    pub fn new(
        client: Arc<dyn HttpClient>,
        token_provider: Arc<dyn AccessTokenProvider>,
        base_url: &Url,
    ) -> Self {
        Self {
            client,
            token_provider,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transactions_path(target: TargetKind, kind: ContentKind) -> String {
        format!("/{target}/{kind}/transactions")
    }

    async fn authorized(
        &self,
        request: RequestBuilder,
        provider: Option<Provider>,
    ) -> Result<RequestBuilder, GatewayError> {
        let token = self.token_provider.access_token().await?;
        let request = request.bearer_auth(token.expose_secret());

        Ok(match provider {
            Some(provider) => request.header(PROVIDER_HEADER, &provider.to_string()),
            None => request,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        provider: Provider,
        path: &str,
    ) -> Result<T, GatewayError> {
        let response = self
            .authorized(self.client.get(&self.url(path)), Some(provider))
            .await?
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json()?)
    }
}

fn parse_snapshot(
    response: Response,
    target: TargetKind,
    kind: ContentKind,
) -> Result<TransactionSnapshot, GatewayError> {
    match kind {
        ContentKind::ToBeSigned => {
            let dto: TransactionResponseDTO<ToBeSignedResultsDTO> = response.json()?;
            snapshot_from_dto(dto, target, to_be_signed_results)
        }
        ContentKind::DocumentHash => {
            let dto: TransactionResponseDTO<Vec<CmsSignedDataDTO>> = response.json()?;
            snapshot_from_dto(dto, target, cms_results)
        }
        ContentKind::Document => {
            let dto: TransactionResponseDTO<Vec<DocumentRevisionDTO>> = response.json()?;
            snapshot_from_dto(dto, target, revision_results)
        }
    }
}

#[async_trait::async_trait]
impl SigningGateway for HttpSigningGateway {
    async fn create_transaction(
        &self,
        provider: Provider,
        request: &CreateTransactionRequest,
    ) -> Result<TransactionSnapshot, GatewayError> {
        let target = request.target.kind();
        let body = create_request_to_dto(request)?;
        let url = self.url(&Self::transactions_path(target, request.kind));

        let response = self
            .authorized(self.client.post(&url), Some(provider))
            .await?
            .json(body)?
            .send()
            .await?
            .error_for_status()?;

        let snapshot = parse_snapshot(response, target, request.kind)?;
        tracing::info!(
            "Created {target} transaction {} with {} unit(s), state {}",
            snapshot.id,
            request.units.len(),
            snapshot.state
        );
        Ok(snapshot)
    }

    async fn authorize_by_tan(
        &self,
        provider: Provider,
        address: &TransactionAddress,
        tan: &SecretString,
    ) -> Result<(), GatewayError> {
        let url = self.url(&format!(
            "{}/{}/2fa",
            Self::transactions_path(address.target, address.kind),
            address.id
        ));

        let response = self
            .authorized(self.client.put(&url), Some(provider))
            .await?
            .json(TanAuthorizeRequestDTO {
                tan: tan.expose_secret(),
            })?
            .send()
            .await?;

        if matches!(response.status.0, 400 | 403 | 422) {
            tracing::warn!("TAN for transaction {} rejected", address.id);
            return Err(GatewayError::TanRejected);
        }

        response.error_for_status()?;
        Ok(())
    }

    async fn get_transaction(
        &self,
        provider: Provider,
        address: &TransactionAddress,
    ) -> Result<TransactionSnapshot, GatewayError> {
        let url = self.url(&format!(
            "{}/{}",
            Self::transactions_path(address.target, address.kind),
            address.id
        ));

        let response = self
            .authorized(self.client.get(&url), Some(provider))
            .await?
            .send()
            .await?
            .error_for_status()?;

        parse_snapshot(response, address.target, address.kind)
    }

    async fn get_available_seals(&self, provider: Provider) -> Result<Vec<Seal>, GatewayError> {
        let response: AvailableSealsDTO = self.get_json(provider, "/seals").await?;

        Ok(response.seals.into_iter().map(Into::into).collect())
    }

    async fn get_seal_certificate(
        &self,
        provider: Provider,
        seal_id: &str,
    ) -> Result<SigningCertificate, GatewayError> {
        let path = format!("/seals/{}/certificates", urlencoding::encode(seal_id));
        let response: CertificateDTO = self.get_json(provider, &path).await?;

        Ok(response.into())
    }

    async fn get_user(&self, provider: Provider, user_id: &str) -> Result<User, GatewayError> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        let response: UserDTO = self.get_json(provider, &path).await?;

        Ok(response.into())
    }

    async fn get_user_state(
        &self,
        provider: Provider,
        user_id: &str,
    ) -> Result<UserState, GatewayError> {
        let path = format!("/users/{}/state", urlencoding::encode(user_id));
        let response: UserStateResponseDTO = self.get_json(provider, &path).await?;

        Ok(response.state.into())
    }

    async fn get_user_certificates(
        &self,
        provider: Provider,
        user_id: &str,
    ) -> Result<Vec<SigningCertificate>, GatewayError> {
        let path = format!("/users/{}/certificates", urlencoding::encode(user_id));
        let response: Vec<CertificateDTO> = self.get_json(provider, &path).await?;

        Ok(response.into_iter().map(Into::into).collect())
    }

    async fn request_timestamps(
        &self,
        timestamp_provider: &str,
        digests: Vec<DigestToTimestamp>,
    ) -> Result<Vec<TimestampToken>, GatewayError> {
        let body = TimestampRequestDTO {
            timestamp_provider,
            digests: digests
                .into_iter()
                .map(|digest| DigestDTO {
                    id: digest.id,
                    hash_algorithm: digest.hash_algorithm,
                    digest: digest.digest,
                })
                .collect(),
        };

        let response: TimestampsDTO = self
            .authorized(self.client.post(&self.url("/timestamp")), None)
            .await?
            .json(body)?
            .send()
            .await?
            .error_for_status()?
            .json()?;

        Ok(response
            .timestamps
            .into_iter()
            .map(|token| TimestampToken {
                id: token.id,
                token: token.timestamp_token,
            })
            .collect())
    }

    async fn upload_document(
        &self,
        provider: Provider,
        content: Vec<u8>,
    ) -> Result<DocumentId, GatewayError> {
        let size = content.len();
        let response: UploadedDocumentDTO = self
            .authorized(self.client.post(&self.url("/documents")), Some(provider))
            .await?
            .octet_stream(content)
            .send()
            .await?
            .error_for_status()?
            .json()?;

        tracing::debug!("Uploaded document {} ({size} bytes)", response.document_id);
        Ok(response.document_id)
    }

    async fn download(&self, href: &Url) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .authorized(self.client.get(href.as_str()), None)
            .await?
            .send()
            .await?
            .error_for_status()?;

        Ok(response.body)
    }
}
