use indexmap::IndexMap;
use shared_types::{CertificateId, UnitId};
use tokio_util::sync::CancellationToken;

use super::SigningService;
use super::dto::{SignerDTO, SigningInputDTO, SigningRequestDTO, SigningResultDTO};
use crate::config::ConfigurationError;
use crate::model::algorithm::{AlgorithmParameters, Provider};
use crate::model::transaction::{SignOptions, Transaction, TransactionTarget};
use crate::model::unit::{ContentKind, RawPayload, RawResult, UnitContent, UnitItem, UnitMetadata};
use crate::provider::crypto_codec::model::SigningContext;
use crate::provider::gateway::model::{
    CreateTransactionRequest, DigestToTimestamp, Seal, SigningCertificate, User, UserState,
};
use crate::service::algorithm::AlgorithmRequest;
use crate::service::correlation::CorrelationError;
use crate::service::error::ServiceError;

impl SigningService {
    /// Runs a complete remote signing workflow and returns one validated artifact per input
    pub async fn sign(
        &self,
        request: SigningRequestDTO,
        cancellation: &CancellationToken,
    ) -> Result<SigningResultDTO, ServiceError> {
        if request.inputs.is_empty() {
            return Err(CorrelationError::EmptyBatch.into());
        }

        let parameters = self.resolver.resolve(&AlgorithmRequest {
            provider: request.provider,
            target: request.signer.target_kind(),
            niveau: request.niveau,
            hash_algorithm: request.hash_algorithm,
            signature_algorithm: request.signature_algorithm,
            profile: request.profile,
        })?;

        let (target, signing_certificate) = self
            .prepare_target(request.provider, &request.signer, request.kind, &parameters)
            .await?;
        let context = SigningContext {
            parameters,
            signing_certificate,
        };

        let items = self
            .unit_items(request.provider, request.kind, &request.inputs, &context)
            .await?;
        let units = self.correlator.prepare_batch(items)?;

        let timestamp_provider = match request.kind {
            ContentKind::DocumentHash if parameters.level.requires_timestamp() => {
                self.config.timestamp.provider.to_owned()
            }
            _ => None,
        };

        let mut transaction = self
            .transactions
            .submit(
                request.provider,
                CreateTransactionRequest {
                    target,
                    kind: request.kind,
                    parameters,
                    units,
                    timestamp_provider,
                },
            )
            .await?;

        self.transactions
            .drive(
                &mut transaction,
                &*self.proof_source,
                &self.config.transaction,
                cancellation,
            )
            .await?;

        let results = self.resolve_results(&transaction).await?;

        let artifacts = transaction
            .units()
            .iter()
            .zip(&request.inputs)
            .map(|(unit, input)| {
                let result = results
                    .get(&unit.id())
                    .ok_or_else(|| CorrelationError::MissingResult(vec![unit.id()]))?;

                self.assembler
                    .assemble(
                        unit.id(),
                        &input.content,
                        &context,
                        result,
                        transaction.validation_data(),
                    )
                    .map_err(ServiceError::from)
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        tracing::info!(
            "Transaction {} produced {} artifact(s)",
            transaction.id(),
            artifacts.len()
        );

        Ok(SigningResultDTO {
            transaction_id: transaction.id(),
            parameters,
            artifacts,
        })
    }

    pub async fn list_seals(&self, provider: Provider) -> Result<Vec<Seal>, ServiceError> {
        self.config.provider.get_enabled(provider)?;

        Ok(self.gateway.get_available_seals(provider).await?)
    }

    pub async fn get_seal_certificate(
        &self,
        provider: Provider,
        seal_id: &str,
    ) -> Result<SigningCertificate, ServiceError> {
        self.config.provider.get_enabled(provider)?;

        Ok(self.gateway.get_seal_certificate(provider, seal_id).await?)
    }

    pub async fn get_user(&self, provider: Provider, user_id: &str) -> Result<User, ServiceError> {
        self.config.provider.get_enabled(provider)?;

        Ok(self.gateway.get_user(provider, user_id).await?)
    }

    pub async fn get_user_state(
        &self,
        provider: Provider,
        user_id: &str,
    ) -> Result<UserState, ServiceError> {
        self.config.provider.get_enabled(provider)?;

        Ok(self.gateway.get_user_state(provider, user_id).await?)
    }

    pub async fn get_user_certificates(
        &self,
        provider: Provider,
        user_id: &str,
    ) -> Result<Vec<SigningCertificate>, ServiceError> {
        self.config.provider.get_enabled(provider)?;

        Ok(self.gateway.get_user_certificates(provider, user_id).await?)
    }

    /// Checks the signer and picks the certificate the signatures are bound to
    async fn prepare_target(
        &self,
        provider: Provider,
        signer: &SignerDTO,
        kind: ContentKind,
        parameters: &AlgorithmParameters,
    ) -> Result<(TransactionTarget, Option<Vec<u8>>), ServiceError> {
        match signer {
            SignerDTO::Seal { seal_id } => {
                let certificate = self.gateway.get_seal_certificate(provider, seal_id).await?;
                if !certificate
                    .signature_algorithms
                    .contains(&parameters.signature_algorithm)
                {
                    return Err(ConfigurationError::AlgorithmNotOffered(
                        parameters.signature_algorithm,
                    )
                    .into());
                }

                Ok((
                    TransactionTarget::Seal {
                        seal_id: seal_id.to_owned(),
                    },
                    Some(certificate.certificate),
                ))
            }
            SignerDTO::User {
                user_id,
                certificate_id,
                redirect_after_page_visit_url,
            } => {
                let user = self.gateway.get_user(provider, user_id).await?;
                if user.state != UserState::Ready {
                    return Err(ServiceError::UserNotReady {
                        user_id: user_id.to_owned(),
                        state: user.state,
                    });
                }

                let confirms_identity = match &user.identification_document {
                    Some(document) if user.needs_recurring_confirmation_of_identity => {
                        self.proof_source.confirm_identity(document).await?
                    }
                    _ => false,
                };

                let certificate = if kind == ContentKind::ToBeSigned {
                    let certificates = self
                        .gateway
                        .get_user_certificates(provider, user_id)
                        .await?;
                    Some(select_certificate(certificates, *certificate_id, parameters)?)
                } else {
                    None
                };

                Ok((
                    TransactionTarget::Sign {
                        user_id: user_id.to_owned(),
                        options: SignOptions {
                            confirms_identity,
                            redirect_after_page_visit_url: redirect_after_page_visit_url
                                .to_owned(),
                            certificate_id: *certificate_id,
                        },
                    },
                    certificate,
                ))
            }
        }
    }

    async fn unit_items(
        &self,
        provider: Provider,
        kind: ContentKind,
        inputs: &[SigningInputDTO],
        context: &SigningContext,
    ) -> Result<Vec<UnitItem>, ServiceError> {
        let mut items = Vec::with_capacity(inputs.len());

        for input in inputs {
            let content = match kind {
                ContentKind::Document => UnitContent::Document(
                    self.gateway
                        .upload_document(provider, input.content.to_owned())
                        .await?,
                ),
                ContentKind::DocumentHash => UnitContent::DocumentHash(
                    self.codec
                        .digest(context.parameters.hash_algorithm, &input.content)?,
                ),
                ContentKind::ToBeSigned => UnitContent::ToBeSigned(
                    self.codec.data_to_be_signed(&input.content, context)?,
                ),
            };

            items.push(UnitItem {
                content,
                metadata: UnitMetadata {
                    origin: input.origin.to_owned(),
                    visual: input.visual.to_owned(),
                },
            });
        }

        Ok(items)
    }

    /// Downloads signed revisions and adds missing timestamps
    async fn resolve_results(
        &self,
        transaction: &Transaction,
    ) -> Result<IndexMap<UnitId, RawResult>, ServiceError> {
        let mut results = transaction.results().to_owned();

        for result in results.values_mut() {
            if let RawPayload::DocumentRevision { href } = &result.payload {
                result.payload = RawPayload::SignedDocument(self.gateway.download(href).await?);
            }
        }

        let parameters = transaction.parameters();
        let Some(timestamp_provider) = &self.config.timestamp.provider else {
            return Ok(results);
        };
        if !parameters.level.requires_timestamp() {
            return Ok(results);
        }

        let mut digests = vec![];
        for (unit_id, result) in &results {
            if let RawPayload::SignatureValue {
                value,
                timestamp: None,
            } = &result.payload
            {
                digests.push(DigestToTimestamp {
                    id: *unit_id,
                    hash_algorithm: parameters.hash_algorithm,
                    digest: self.codec.digest(parameters.hash_algorithm, value)?,
                });
            }
        }
        if digests.is_empty() {
            return Ok(results);
        }

        let unit_ids: Vec<UnitId> = digests.iter().map(|digest| digest.id).collect();
        let tokens = self
            .gateway
            .request_timestamps(timestamp_provider, digests)
            .await?;
        let tokens = self.correlator.match_timestamps(&unit_ids, tokens)?;

        tracing::debug!(
            "Timestamped {} signature value(s) of transaction {}",
            tokens.len(),
            transaction.id()
        );

        for (unit_id, token) in tokens {
            if let Some(RawResult {
                payload: RawPayload::SignatureValue { timestamp, .. },
                ..
            }) = results.get_mut(&unit_id)
            {
                *timestamp = Some(token);
            }
        }

        Ok(results)
    }
}

fn select_certificate(
    certificates: Vec<SigningCertificate>,
    certificate_id: Option<CertificateId>,
    parameters: &AlgorithmParameters,
) -> Result<Vec<u8>, ServiceError> {
    let certificate = match certificate_id {
        Some(certificate_id) => certificates
            .into_iter()
            .find(|certificate| certificate.id == Some(certificate_id))
            .ok_or(ServiceError::MissingSigningCertificate)?,
        None => certificates
            .into_iter()
            .find(|certificate| {
                certificate
                    .signature_algorithms
                    .contains(&parameters.signature_algorithm)
            })
            .ok_or(ConfigurationError::AlgorithmNotOffered(
                parameters.signature_algorithm,
            ))?,
    };

    if !certificate
        .signature_algorithms
        .contains(&parameters.signature_algorithm)
    {
        return Err(ConfigurationError::AlgorithmNotOffered(parameters.signature_algorithm).into());
    }

    Ok(certificate.certificate)
}
