use std::sync::Arc;

use crate::config::core_config::CoreConfig;
use crate::provider::crypto_codec::CryptoCodec;
use crate::provider::gateway::SigningGateway;
use crate::provider::proof::ExternalProofSource;
use crate::service::algorithm::AlgorithmResolver;
use crate::service::assembly::SignatureAssembler;
use crate::service::correlation::UnitCorrelator;
use crate::service::transaction::TransactionService;

pub mod dto;
pub mod service;

#[derive(Clone)]
pub struct SigningService {
    config: Arc<CoreConfig>,
    gateway: Arc<dyn SigningGateway>,
    codec: Arc<dyn CryptoCodec>,
    proof_source: Arc<dyn ExternalProofSource>,
    resolver: AlgorithmResolver,
    correlator: UnitCorrelator,
    transactions: TransactionService,
    assembler: SignatureAssembler,
}

impl SigningService {
    pub fn new(
        config: Arc<CoreConfig>,
        gateway: Arc<dyn SigningGateway>,
        codec: Arc<dyn CryptoCodec>,
        proof_source: Arc<dyn ExternalProofSource>,
    ) -> Self {
        Self {
            resolver: AlgorithmResolver::new(Arc::new(config.provider.clone())),
            correlator: UnitCorrelator,
            transactions: TransactionService::new(gateway.clone()),
            assembler: SignatureAssembler::new(codec.clone()),
            config,
            gateway,
            codec,
            proof_source,
        }
    }
}
