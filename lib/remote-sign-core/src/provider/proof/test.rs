use secrecy::ExposeSecret;
use shared_types::TransactionId;

use super::{ExternalProofSource, Proof, ProofError, proof_channel};

#[tokio::test]
async fn test_tan_from_channel() {
    let (sender, source) = proof_channel(1);

    sender
        .send(Proof::Tan("123456".to_string().into()))
        .await
        .unwrap();

    let tan = source
        .tan(TransactionId::new_random(), Some("+49***123".to_string()), 1)
        .await
        .unwrap();

    assert_eq!("123456", tan.expose_secret());
}

#[tokio::test]
async fn test_page_visit_from_other_task() {
    let (sender, source) = proof_channel(1);
    let url = "https://provider.example.com/confirm".parse().unwrap();

    let handle = tokio::spawn(async move { sender.send(Proof::PageVisited).await });

    source
        .page_visit_completed(TransactionId::new_random(), &url)
        .await
        .unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unexpected_proof() {
    let (sender, source) = proof_channel(1);
    sender.send(Proof::PageVisited).await.unwrap();

    let result = source.tan(TransactionId::new_random(), None, 1).await;

    assert!(matches!(
        result,
        Err(ProofError::Unexpected { expected: "TAN" })
    ));
}

#[tokio::test]
async fn test_closed_channel() {
    let (sender, source) = proof_channel(1);
    drop(sender);

    let result = source.tan(TransactionId::new_random(), None, 1).await;

    assert!(matches!(result, Err(ProofError::Closed)));
}
