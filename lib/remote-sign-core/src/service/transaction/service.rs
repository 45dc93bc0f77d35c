use std::time::Duration;

use indexmap::IndexMap;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use super::TransactionService;
use super::error::TransactionError;
use crate::model::algorithm::Provider;
use crate::model::transaction::{Challenge, Transaction, TransactionState};
use crate::provider::gateway::model::{CreateTransactionRequest, TransactionSnapshot};
use crate::provider::proof::ExternalProofSource;
use crate::service::correlation::{CorrelationError, batch_kind};

impl TransactionService {
    /// Creates the transaction at the provider, the state follows the immediate response
    pub async fn submit(
        &self,
        provider: Provider,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, TransactionError> {
        let kind = batch_kind(request.units.iter().map(|unit| &unit.content))?;
        if kind != request.kind {
            return Err(CorrelationError::MixedBatch {
                expected: request.kind,
                found: kind,
            }
            .into());
        }

        let snapshot = self.gateway.create_transaction(provider, &request).await?;

        let mut transaction = Transaction {
            id: snapshot.id,
            provider,
            target: request.target,
            kind,
            parameters: request.parameters,
            state: TransactionState::Submitted,
            challenge: None,
            units: request.units,
            results: IndexMap::new(),
            validation_data: None,
        };
        self.apply(&mut transaction, snapshot)?;

        Ok(transaction)
    }

    /// Forwards a TAN, the state is only changed by a subsequent [`Self::poll`]
    pub async fn authorize_by_tan(
        &self,
        transaction: &Transaction,
        tan: &SecretString,
    ) -> Result<(), TransactionError> {
        expect_state(transaction, "authorizeByTan", TransactionState::TanRequired)?;

        self.gateway
            .authorize_by_tan(transaction.provider, &transaction.address(), tan)
            .await?;

        tracing::debug!("TAN accepted for transaction {}", transaction.id);
        Ok(())
    }

    /// Waits until the proof source reports the page visit
    pub async fn await_page_visit(
        &self,
        transaction: &Transaction,
        proof_source: &dyn ExternalProofSource,
        timeout: Duration,
        cancellation: &CancellationToken,
    ) -> Result<(), TransactionError> {
        expect_state(
            transaction,
            "awaitPageVisit",
            TransactionState::PageVisitRequired,
        )?;

        let Some(Challenge::PageVisit { url }) = &transaction.challenge else {
            return Err(TransactionError::InvalidState {
                operation: "awaitPageVisit",
                state: transaction.state,
            });
        };

        tokio::select! {
            _ = cancellation.cancelled() => Err(TransactionError::Cancelled),
            visited = tokio::time::timeout(
                timeout,
                proof_source.page_visit_completed(transaction.id, url),
            ) => {
                visited.map_err(|_| TransactionError::Timeout)??;
                Ok(())
            }
        }
    }

    /// Re-queries a pending transaction, no-op once finished
    pub async fn poll(
        &self,
        transaction: &mut Transaction,
    ) -> Result<TransactionState, TransactionError> {
        match transaction.state {
            TransactionState::Finished => return Ok(TransactionState::Finished),
            TransactionState::Failed => {
                return Err(TransactionError::InvalidState {
                    operation: "poll",
                    state: TransactionState::Failed,
                });
            }
            TransactionState::Submitted
            | TransactionState::TanRequired
            | TransactionState::PageVisitRequired => {}
        }

        let snapshot = self
            .gateway
            .get_transaction(transaction.provider, &transaction.address())
            .await?;

        self.apply(transaction, snapshot)
    }

    fn apply(
        &self,
        transaction: &mut Transaction,
        snapshot: TransactionSnapshot,
    ) -> Result<TransactionState, TransactionError> {
        let previous = transaction.state;

        if snapshot.state == TransactionState::Finished {
            match self
                .correlator
                .match_results(&transaction.units, snapshot.results)
            {
                Ok(results) => {
                    transaction.results = results;
                    transaction.validation_data = snapshot.validation_data;
                }
                Err(error) => {
                    transaction.state = TransactionState::Failed;
                    transaction.challenge = None;
                    tracing::error!("Transaction {} failed: {error}", transaction.id);

                    return Err(match error {
                        CorrelationError::MissingResult(missing) => {
                            TransactionError::IncompleteResult { missing }
                        }
                        error => error.into(),
                    });
                }
            }
        }

        transaction.state = snapshot.state;
        transaction.challenge = snapshot.challenge;

        if previous != transaction.state {
            tracing::info!(
                "Transaction {} {previous} -> {}",
                transaction.id,
                transaction.state
            );
        }
        Ok(transaction.state)
    }
}

fn expect_state(
    transaction: &Transaction,
    operation: &'static str,
    expected: TransactionState,
) -> Result<(), TransactionError> {
    if transaction.state != expected {
        return Err(TransactionError::InvalidState {
            operation,
            state: transaction.state,
        });
    }
    Ok(())
}
