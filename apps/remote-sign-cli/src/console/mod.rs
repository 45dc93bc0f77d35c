//! Proof source prompting the operator on a terminal

use remote_sign_core::provider::gateway::model::IdentificationDocument;
use remote_sign_core::provider::proof::{ExternalProofSource, ProofError};
use secrecy::SecretString;
use shared_types::TransactionId;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};
use tokio::sync::Mutex;
use url::Url;

struct Console<R, W> {
    lines: Lines<R>,
    output: W,
}

pub struct ConsoleProofSource<R, W> {
    console: Mutex<Console<R, W>>,
}

impl ConsoleProofSource<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsoleProofSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            console: Mutex::new(Console {
                lines: input.lines(),
                output,
            }),
        }
    }

    async fn ask(&self, prompt: &str) -> Result<String, ProofError> {
        let mut console = self.console.lock().await;

        console
            .output
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| ProofError::Failed(e.to_string()))?;
        console
            .output
            .flush()
            .await
            .map_err(|e| ProofError::Failed(e.to_string()))?;

        let line = console
            .lines
            .next_line()
            .await
            .map_err(|e| ProofError::Failed(e.to_string()))?
            .ok_or(ProofError::Closed)?;

        Ok(line.trim().to_owned())
    }
}

#[async_trait::async_trait]
impl<R, W> ExternalProofSource for ConsoleProofSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn tan(
        &self,
        transaction_id: TransactionId,
        sent_to: Option<String>,
        attempt: u32,
    ) -> Result<SecretString, ProofError> {
        let destination = sent_to
            .map(|sent_to| format!(" sent to {sent_to}"))
            .unwrap_or_default();
        let tan = self
            .ask(&format!(
                "TAN{destination} for transaction {transaction_id} (attempt {attempt}): "
            ))
            .await?;

        Ok(SecretString::from(tan))
    }

    async fn page_visit_completed(
        &self,
        transaction_id: TransactionId,
        url: &Url,
    ) -> Result<(), ProofError> {
        self.ask(&format!(
            "Confirm transaction {transaction_id} at {url}, then press enter: "
        ))
        .await?;

        Ok(())
    }

    async fn confirm_identity(
        &self,
        document: &IdentificationDocument,
    ) -> Result<bool, ProofError> {
        let name = [&document.given_name, &document.family_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let expires = document
            .expires_on
            .as_ref()
            .map(|expires_on| format!(", expires {expires_on}"))
            .unwrap_or_default();

        let answer = self
            .ask(&format!("Is this you: {name}{expires}? [y/N] "))
            .await?;

        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod test;
