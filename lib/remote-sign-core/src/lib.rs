#![cfg_attr(feature = "strict", deny(warnings))]

use std::sync::Arc;

use config::core_config::CoreConfig;
use provider::crypto_codec::CryptoCodec;
use provider::crypto_codec::cbor::CborContainerCodec;
use provider::gateway::http::HttpSigningGateway;
use provider::gateway::{GatewayError, SigningGateway};
use provider::http_client::reqwest_client::ReqwestClient;
use provider::oauth::ClientCredentialsTokenProvider;
use provider::proof::ExternalProofSource;
use remote_sign_crypto::CryptoProviderImpl;
use service::error::ServiceError;
use service::signing::SigningService;

pub mod config;
pub mod model;
pub mod provider;
pub mod service;

#[derive(Clone)]
pub struct RemoteSignCore {
    pub signing_service: SigningService,
    pub gateway: Arc<dyn SigningGateway>,
    pub codec: Arc<dyn CryptoCodec>,
}

impl RemoteSignCore {
    /// Wires the HTTP gateway and the reference codec from configuration
    pub fn new(
        config: CoreConfig,
        proof_source: Arc<dyn ExternalProofSource>,
    ) -> Result<Self, ServiceError> {
        let client = Arc::new(
            ReqwestClient::with_timeout(config.gateway.request_timeout)
                .map_err(GatewayError::from)?,
        );
        let token_provider = Arc::new(ClientCredentialsTokenProvider::new(
            client.clone(),
            &config.gateway.oauth,
        )?);
        let gateway: Arc<dyn SigningGateway> = Arc::new(HttpSigningGateway::new(
            client,
            token_provider,
            &config.gateway.url,
        ));
        let codec: Arc<dyn CryptoCodec> =
            Arc::new(CborContainerCodec::new(Arc::new(CryptoProviderImpl::default())));

        Ok(Self::with_providers(config, gateway, codec, proof_source))
    }

    pub fn with_providers(
        config: CoreConfig,
        gateway: Arc<dyn SigningGateway>,
        codec: Arc<dyn CryptoCodec>,
        proof_source: Arc<dyn ExternalProofSource>,
    ) -> Self {
        Self {
            signing_service: SigningService::new(
                Arc::new(config),
                gateway.clone(),
                codec.clone(),
                proof_source,
            ),
            gateway,
            codec,
        }
    }
}
