//! Out-of-band proofs (TAN entry, page visit, identity confirmation) supplied by the caller

use secrecy::SecretString;
use shared_types::TransactionId;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use url::Url;

use crate::provider::gateway::model::IdentificationDocument;

#[derive(Debug, Error)]
pub enum ProofError {
    #[error("Proof source closed")]
    Closed,
    #[error("Unexpected proof: expected `{expected}`")]
    Unexpected { expected: &'static str },
    #[error("Proof source failed: `{0}`")]
    Failed(String),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait ExternalProofSource: Send + Sync {
    /// TAN for the given transaction; `attempt` starts at 1
    async fn tan(
        &self,
        transaction_id: TransactionId,
        sent_to: Option<String>,
        attempt: u32,
    ) -> Result<SecretString, ProofError>;

    /// Resolves once the user acknowledged the transaction on the provider page
    async fn page_visit_completed(
        &self,
        transaction_id: TransactionId,
        url: &Url,
    ) -> Result<(), ProofError>;

    async fn confirm_identity(&self, document: &IdentificationDocument)
    -> Result<bool, ProofError>;
}

#[derive(Debug)]
pub enum Proof {
    Tan(SecretString),
    PageVisited,
    IdentityConfirmed(bool),
}

#[derive(Clone)]
pub struct ProofSender(mpsc::Sender<Proof>);

impl ProofSender {
    pub async fn send(&self, proof: Proof) -> Result<(), ProofError> {
        self.0.send(proof).await.map_err(|_| ProofError::Closed)
    }
}

/// Proof source fed from another task through a channel
pub struct ChannelProofSource {
    receiver: Mutex<mpsc::Receiver<Proof>>,
}

pub fn proof_channel(buffer: usize) -> (ProofSender, ChannelProofSource) {
    let (sender, receiver) = mpsc::channel(buffer);
    (
        ProofSender(sender),
        ChannelProofSource {
            receiver: Mutex::new(receiver),
        },
    )
}

impl ChannelProofSource {
    async fn next(&self) -> Result<Proof, ProofError> {
        self.receiver.lock().await.recv().await.ok_or(ProofError::Closed)
    }
}

#[async_trait::async_trait]
impl ExternalProofSource for ChannelProofSource {
    async fn tan(
        &self,
        transaction_id: TransactionId,
        sent_to: Option<String>,
        attempt: u32,
    ) -> Result<SecretString, ProofError> {
        tracing::info!(%transaction_id, ?sent_to, attempt, "Waiting for TAN");

        match self.next().await? {
            Proof::Tan(tan) => Ok(tan),
            _ => Err(ProofError::Unexpected { expected: "TAN" }),
        }
    }

    async fn page_visit_completed(
        &self,
        transaction_id: TransactionId,
        url: &Url,
    ) -> Result<(), ProofError> {
        tracing::info!(%transaction_id, %url, "Waiting for page visit");

        match self.next().await? {
            Proof::PageVisited => Ok(()),
            _ => Err(ProofError::Unexpected {
                expected: "page visit",
            }),
        }
    }

    async fn confirm_identity(
        &self,
        _document: &IdentificationDocument,
    ) -> Result<bool, ProofError> {
        match self.next().await? {
            Proof::IdentityConfirmed(confirmed) => Ok(confirmed),
            _ => Err(ProofError::Unexpected {
                expected: "identity confirmation",
            }),
        }
    }
}

#[cfg(test)]
mod test;
