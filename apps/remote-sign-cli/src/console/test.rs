use remote_sign_core::provider::gateway::model::IdentificationDocument;
use remote_sign_core::provider::proof::{ExternalProofSource, ProofError};
use secrecy::ExposeSecret;
use shared_types::TransactionId;
use similar_asserts::assert_eq;

use super::ConsoleProofSource;

fn console(input: &'static str) -> ConsoleProofSource<&'static [u8], Vec<u8>> {
    ConsoleProofSource::new(input.as_bytes(), vec![])
}

#[tokio::test]
async fn test_tan_is_read_per_attempt() {
    let source = console(" 123456 \n654321\n");
    let id = TransactionId::new_random();

    let first = source.tan(id, Some("+41 79 *** 12".to_string()), 1).await.unwrap();
    let second = source.tan(id, None, 2).await.unwrap();

    assert_eq!("123456", first.expose_secret());
    assert_eq!("654321", second.expose_secret());
}

#[tokio::test]
async fn test_page_visit_waits_for_enter() {
    let source = console("\n");

    let result = source
        .page_visit_completed(
            TransactionId::new_random(),
            &"https://datasign.example.com/visit".parse().unwrap(),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_identity_confirmation_answers() {
    let source = console("y\nYES\nn\n\n");
    let document = IdentificationDocument {
        given_name: Some("Jane".to_string()),
        family_name: Some("Doe".to_string()),
        ..Default::default()
    };

    assert!(source.confirm_identity(&document).await.unwrap());
    assert!(source.confirm_identity(&document).await.unwrap());
    assert!(!source.confirm_identity(&document).await.unwrap());
    assert!(!source.confirm_identity(&document).await.unwrap());
}

#[tokio::test]
async fn test_closed_input() {
    let source = console("");

    let result = source.tan(TransactionId::new_random(), None, 1).await;

    assert!(matches!(result, Err(ProofError::Closed)));
}
