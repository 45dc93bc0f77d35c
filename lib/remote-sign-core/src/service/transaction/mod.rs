use std::sync::Arc;

use crate::provider::gateway::SigningGateway;
use crate::service::correlation::UnitCorrelator;

pub mod driver;
pub mod error;
pub mod service;

/// Lifecycle of remote signing transactions, the only place their state changes
#[derive(Clone)]
pub struct TransactionService {
    gateway: Arc<dyn SigningGateway>,
    correlator: UnitCorrelator,
}

impl TransactionService {
    pub fn new(gateway: Arc<dyn SigningGateway>) -> Self {
        Self {
            gateway,
            correlator: UnitCorrelator,
        }
    }
}

#[cfg(test)]
mod test;
