use shared_types::UnitId;
use thiserror::Error;

use crate::model::transaction::TransactionState;
use crate::provider::gateway::GatewayError;
use crate::provider::proof::ProofError;
use crate::service::correlation::CorrelationError;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("`{operation}` not allowed in state `{state}`")]
    InvalidState {
        operation: &'static str,
        state: TransactionState,
    },
    #[error("Finished transaction lacks results for unit(s) {missing:?}")]
    IncompleteResult { missing: Vec<UnitId> },
    #[error("Transaction did not finish in time")]
    Timeout,
    #[error("Transaction cancelled")]
    Cancelled,
    #[error("TAN rejected {0} time(s)")]
    TanAttemptsExceeded(u32),
    #[error("Gateway error: `{0}`")]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Correlation(#[from] CorrelationError),
    #[error("Proof error: `{0}`")]
    Proof(#[from] ProofError),
}
