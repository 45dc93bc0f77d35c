//! Generic loop taking a transaction from any challenge to a terminal state

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::TransactionService;
use super::error::TransactionError;
use crate::config::core_config::{PollingConfig, TransactionConfig};
use crate::model::transaction::{Challenge, Transaction, TransactionState};
use crate::provider::gateway::GatewayError;
use crate::provider::proof::ExternalProofSource;

impl TransactionService {
    /// Supplies proofs from `proof_source` and polls with backoff until the transaction finishes.
    ///
    /// The polling deadline bounds the whole run, including the waits for proofs.
    pub async fn drive(
        &self,
        transaction: &mut Transaction,
        proof_source: &dyn ExternalProofSource,
        config: &TransactionConfig,
        cancellation: &CancellationToken,
    ) -> Result<(), TransactionError> {
        let deadline = Instant::now() + config.polling.deadline;
        let mut tan_attempts = 0;

        loop {
            let phase = transaction.state;
            match phase {
                TransactionState::Finished => return Ok(()),
                TransactionState::Failed => {
                    return Err(TransactionError::InvalidState {
                        operation: "drive",
                        state: phase,
                    });
                }
                TransactionState::TanRequired => {
                    self.supply_tan(
                        transaction,
                        proof_source,
                        config.max_tan_attempts,
                        &mut tan_attempts,
                        deadline,
                        cancellation,
                    )
                    .await?;
                }
                TransactionState::PageVisitRequired => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    self.await_page_visit(
                        transaction,
                        proof_source,
                        config.page_visit_timeout.min(remaining),
                        cancellation,
                    )
                    .await?;
                }
                TransactionState::Submitted => {}
            }

            self.poll_until_left(transaction, phase, &config.polling, deadline, cancellation)
                .await?;
        }
    }

    /// Asks for TANs until one is accepted, a rejected TAN keeps the state
    async fn supply_tan(
        &self,
        transaction: &Transaction,
        proof_source: &dyn ExternalProofSource,
        max_attempts: u32,
        attempts: &mut u32,
        deadline: Instant,
        cancellation: &CancellationToken,
    ) -> Result<(), TransactionError> {
        loop {
            if *attempts >= max_attempts {
                return Err(TransactionError::TanAttemptsExceeded(*attempts));
            }
            *attempts += 1;

            let sent_to = match &transaction.challenge {
                Some(Challenge::Tan { sent_to }) => sent_to.to_owned(),
                _ => None,
            };
            let tan = bounded(
                deadline,
                cancellation,
                proof_source.tan(transaction.id, sent_to, *attempts),
            )
            .await??;

            match self.authorize_by_tan(transaction, &tan).await {
                Ok(()) => return Ok(()),
                Err(TransactionError::Gateway(GatewayError::TanRejected)) => {
                    tracing::warn!(
                        "TAN attempt {attempts}/{max_attempts} rejected for transaction {}",
                        transaction.id
                    );
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn poll_until_left(
        &self,
        transaction: &mut Transaction,
        phase: TransactionState,
        polling: &PollingConfig,
        deadline: Instant,
        cancellation: &CancellationToken,
    ) -> Result<(), TransactionError> {
        let mut interval = polling.initial_interval;

        loop {
            match self.poll(transaction).await {
                Ok(state) if state != phase => return Ok(()),
                Ok(_) => {}
                Err(TransactionError::Gateway(error)) if error.is_retryable() => {
                    tracing::warn!("Polling transaction {} failed: {error}", transaction.id);
                }
                Err(error) => return Err(error),
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!("Transaction {} still {phase} at deadline", transaction.id);
                return Err(TransactionError::Timeout);
            }

            bounded(
                deadline,
                cancellation,
                tokio::time::sleep(interval.min(remaining)),
            )
            .await?;
            interval = next_interval(interval, polling);
        }
    }
}

fn next_interval(interval: Duration, polling: &PollingConfig) -> Duration {
    Duration::try_from_secs_f64(interval.as_secs_f64() * polling.multiplier.max(1.0))
        .unwrap_or(polling.max_interval)
        .min(polling.max_interval)
}

async fn bounded<T>(
    deadline: Instant,
    cancellation: &CancellationToken,
    future: impl Future<Output = T>,
) -> Result<T, TransactionError> {
    tokio::select! {
        _ = cancellation.cancelled() => Err(TransactionError::Cancelled),
        result = tokio::time::timeout_at(deadline, future) => {
            result.map_err(|_| TransactionError::Timeout)
        }
    }
}
