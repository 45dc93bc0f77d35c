use std::sync::Arc;
use std::time::Duration;

use mockall::Sequence;
use mockall::predicate::eq;
use secrecy::{ExposeSecret, SecretString};
use shared_types::TransactionId;
use similar_asserts::assert_eq;
use tokio_util::sync::CancellationToken;

use super::TransactionService;
use super::error::TransactionError;
use crate::config::core_config::{PollingConfig, TransactionConfig};
use crate::model::algorithm::{Provider, SignatureLevel, SignaturePackaging};
use crate::model::transaction::{
    Challenge, SignOptions, Transaction, TransactionState, TransactionTarget,
};
use crate::model::unit::{
    ContentKind, RawPayload, RawResult, SignableUnit, UnitContent, UnitItem, UnitMetadata,
};
use crate::provider::gateway::model::{CreateTransactionRequest, TransactionSnapshot};
use crate::provider::gateway::{GatewayError, MockSigningGateway};
use crate::provider::proof::{MockExternalProofSource, Proof, proof_channel};
use crate::service::correlation::{CorrelationError, UnitCorrelator};
use crate::service::test_utilities::ecdsa_parameters;

fn hash_units(count: u8) -> Vec<SignableUnit> {
    UnitCorrelator
        .prepare_batch(
            (0..count)
                .map(|i| UnitItem {
                    content: UnitContent::DocumentHash(vec![i; 32]),
                    metadata: UnitMetadata::default(),
                })
                .collect(),
        )
        .unwrap()
}

fn sign_request(units: Vec<SignableUnit>) -> CreateTransactionRequest {
    CreateTransactionRequest {
        target: TransactionTarget::Sign {
            user_id: "user-1".to_string(),
            options: SignOptions::default(),
        },
        kind: ContentKind::DocumentHash,
        parameters: ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB),
        units,
        timestamp_provider: None,
    }
}

fn cms_result(unit: &SignableUnit) -> RawResult {
    RawResult {
        key: unit.result_key(),
        payload: RawPayload::CmsSignedData(vec![0xC0]),
    }
}

fn snapshot(
    id: TransactionId,
    state: TransactionState,
    challenge: Option<Challenge>,
    results: Vec<RawResult>,
) -> TransactionSnapshot {
    TransactionSnapshot {
        id,
        state,
        challenge,
        results,
        validation_data: None,
    }
}

fn tan_challenge() -> Option<Challenge> {
    Some(Challenge::Tan {
        sent_to: Some("+41 ** *** 12".to_string()),
    })
}

fn page_visit_challenge() -> Option<Challenge> {
    Some(Challenge::PageVisit {
        url: "https://datasign.example.com/visit/1".parse().unwrap(),
    })
}

fn submitted(
    gateway: &mut MockSigningGateway,
    units: Vec<SignableUnit>,
    state: TransactionState,
    challenge: Option<Challenge>,
) -> (TransactionId, CreateTransactionRequest) {
    let id = TransactionId::new_random();
    gateway
        .expect_create_transaction()
        .once()
        .returning(move |_, _| Ok(snapshot(id, state, challenge.clone(), vec![])));

    (id, sign_request(units))
}

fn config(max_tan_attempts: u32) -> TransactionConfig {
    TransactionConfig {
        polling: PollingConfig {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(4),
            multiplier: 2.0,
            deadline: Duration::from_secs(60),
        },
        page_visit_timeout: Duration::from_secs(30),
        max_tan_attempts,
    }
}

#[tokio::test]
async fn test_synchronous_finish_skips_challenge_and_poll_is_idempotent() {
    // given
    let units = hash_units(1);
    let result = cms_result(&units[0]);
    let id = TransactionId::new_random();

    let mut gateway = MockSigningGateway::default();
    let returned = result.clone();
    gateway
        .expect_create_transaction()
        .once()
        .withf(|provider, request| {
            *provider == Provider::Dtrust && request.kind == ContentKind::DocumentHash
        })
        .returning(move |_, _| {
            Ok(snapshot(
                id,
                TransactionState::Finished,
                None,
                vec![returned.clone()],
            ))
        });

    let service = TransactionService::new(Arc::new(gateway));

    // when
    let mut transaction = service
        .submit(Provider::Dtrust, sign_request(units.clone()))
        .await
        .unwrap();

    // then
    assert_eq!(id, transaction.id());
    assert_eq!(TransactionState::Finished, transaction.state());
    assert_eq!(None, transaction.challenge());
    assert_eq!(Some(&result), transaction.results().get(&units[0].id()));

    let before = transaction.clone();
    for _ in 0..3 {
        assert_eq!(
            TransactionState::Finished,
            service.poll(&mut transaction).await.unwrap()
        );
        assert_eq!(before, transaction);
    }
}

#[tokio::test]
async fn test_authorize_by_tan_outside_tan_required_is_rejected_locally() {
    let mut gateway = MockSigningGateway::default();
    let (_, request) = submitted(
        &mut gateway,
        hash_units(1),
        TransactionState::PageVisitRequired,
        page_visit_challenge(),
    );
    gateway.expect_authorize_by_tan().never();

    let service = TransactionService::new(Arc::new(gateway));
    let transaction = service.submit(Provider::Bv, request).await.unwrap();

    let result = service
        .authorize_by_tan(&transaction, &"123456".to_string().into())
        .await;

    assert!(matches!(
        result,
        Err(TransactionError::InvalidState {
            operation: "authorizeByTan",
            state: TransactionState::PageVisitRequired,
        })
    ));
}

#[tokio::test]
async fn test_document_hash_with_tan_wrong_then_correct() {
    // given
    let units = hash_units(1);
    let result = cms_result(&units[0]);

    let mut gateway = MockSigningGateway::default();
    let (id, request) = submitted(
        &mut gateway,
        units.clone(),
        TransactionState::TanRequired,
        tan_challenge(),
    );

    let mut seq = Sequence::new();
    gateway
        .expect_authorize_by_tan()
        .once()
        .in_sequence(&mut seq)
        .withf(|_, _, tan| tan.expose_secret() == "000000")
        .returning(|_, _, _| Err(GatewayError::TanRejected));
    gateway
        .expect_authorize_by_tan()
        .once()
        .in_sequence(&mut seq)
        .withf(move |provider, address, tan| {
            *provider == Provider::Bv && address.id == id && tan.expose_secret() == "123456"
        })
        .returning(|_, _, _| Ok(()));
    let returned = result.clone();
    gateway
        .expect_get_transaction()
        .once()
        .in_sequence(&mut seq)
        .with(eq(Provider::Bv), mockall::predicate::always())
        .returning(move |_, _| {
            Ok(snapshot(
                id,
                TransactionState::Finished,
                None,
                vec![returned.clone()],
            ))
        });

    let service = TransactionService::new(Arc::new(gateway));
    let mut transaction = service.submit(Provider::Bv, request).await.unwrap();
    assert_eq!(TransactionState::TanRequired, transaction.state());

    // when
    let wrong = service
        .authorize_by_tan(&transaction, &"000000".to_string().into())
        .await;

    // then
    assert!(matches!(
        wrong,
        Err(TransactionError::Gateway(GatewayError::TanRejected))
    ));
    assert_eq!(TransactionState::TanRequired, transaction.state());

    service
        .authorize_by_tan(&transaction, &"123456".to_string().into())
        .await
        .unwrap();
    assert_eq!(TransactionState::TanRequired, transaction.state());

    let state = service.poll(&mut transaction).await.unwrap();
    assert_eq!(TransactionState::Finished, state);
    assert_eq!(1, transaction.results().len());
    assert_eq!(Some(&result), transaction.results().get(&units[0].id()));
}

#[tokio::test]
async fn test_missing_result_fails_transaction() {
    // given
    let units = hash_units(2);
    let only_first = cms_result(&units[0]);

    let mut gateway = MockSigningGateway::default();
    let (id, request) = submitted(
        &mut gateway,
        units.clone(),
        TransactionState::TanRequired,
        tan_challenge(),
    );
    gateway.expect_get_transaction().once().returning(move |_, _| {
        Ok(snapshot(
            id,
            TransactionState::Finished,
            None,
            vec![only_first.clone()],
        ))
    });

    let service = TransactionService::new(Arc::new(gateway));
    let mut transaction = service.submit(Provider::Bv, request).await.unwrap();

    // when
    let result = service.poll(&mut transaction).await;

    // then
    match result {
        Err(TransactionError::IncompleteResult { missing }) => {
            assert_eq!(vec![units[1].id()], missing)
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(TransactionState::Failed, transaction.state());
    assert!(transaction.results().is_empty());

    assert!(matches!(
        service.poll(&mut transaction).await,
        Err(TransactionError::InvalidState {
            operation: "poll",
            state: TransactionState::Failed,
        })
    ));
}

#[tokio::test]
async fn test_unknown_result_fails_transaction_with_correlation_error() {
    let units = hash_units(1);
    let results = vec![cms_result(&units[0]), cms_result(&hash_units(1)[0])];
    let id = TransactionId::new_random();

    let mut gateway = MockSigningGateway::default();
    gateway.expect_create_transaction().once().returning(move |_, _| {
        Ok(snapshot(
            id,
            TransactionState::Finished,
            None,
            results.clone(),
        ))
    });

    let service = TransactionService::new(Arc::new(gateway));
    let result = service.submit(Provider::Bv, sign_request(units)).await;

    assert!(matches!(
        result,
        Err(TransactionError::Correlation(
            CorrelationError::UnknownResult(_)
        ))
    ));
}

#[tokio::test]
async fn test_submit_rejects_units_of_other_kind_without_gateway_call() {
    let mut gateway = MockSigningGateway::default();
    gateway.expect_create_transaction().never();

    let service = TransactionService::new(Arc::new(gateway));
    let request = CreateTransactionRequest {
        kind: ContentKind::ToBeSigned,
        ..sign_request(hash_units(1))
    };

    let result = service.submit(Provider::Bv, request).await;

    assert!(matches!(
        result,
        Err(TransactionError::Correlation(CorrelationError::MixedBatch {
            expected: ContentKind::ToBeSigned,
            found: ContentKind::DocumentHash,
        }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_drive_retries_rejected_tan_and_polls_with_backoff() {
    // given
    let units = hash_units(1);
    let result = cms_result(&units[0]);

    let mut gateway = MockSigningGateway::default();
    let (id, request) = submitted(
        &mut gateway,
        units.clone(),
        TransactionState::TanRequired,
        tan_challenge(),
    );

    let mut seq = Sequence::new();
    gateway
        .expect_authorize_by_tan()
        .once()
        .in_sequence(&mut seq)
        .returning(|_, _, _| Err(GatewayError::TanRejected));
    gateway
        .expect_authorize_by_tan()
        .once()
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    gateway
        .expect_get_transaction()
        .once()
        .in_sequence(&mut seq)
        .returning(move |_, _| Ok(snapshot(id, TransactionState::TanRequired, tan_challenge(), vec![])));
    gateway
        .expect_get_transaction()
        .once()
        .in_sequence(&mut seq)
        .returning(|_, _| Err(GatewayError::Status(503)));
    let returned = result.clone();
    gateway
        .expect_get_transaction()
        .once()
        .in_sequence(&mut seq)
        .returning(move |_, _| {
            Ok(snapshot(
                id,
                TransactionState::Finished,
                None,
                vec![returned.clone()],
            ))
        });

    let mut proof_source = MockExternalProofSource::default();
    proof_source
        .expect_tan()
        .with(eq(id), eq(Some("+41 ** *** 12".to_string())), eq(1))
        .once()
        .returning(|_, _, _| Ok(SecretString::from("000000".to_string())));
    proof_source
        .expect_tan()
        .with(eq(id), eq(Some("+41 ** *** 12".to_string())), eq(2))
        .once()
        .returning(|_, _, _| Ok(SecretString::from("123456".to_string())));

    let service = TransactionService::new(Arc::new(gateway));
    let mut transaction = service.submit(Provider::Bv, request).await.unwrap();

    // when
    let started = tokio::time::Instant::now();
    service
        .drive(
            &mut transaction,
            &proof_source,
            &config(3),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    // then
    assert_eq!(TransactionState::Finished, transaction.state());
    assert_eq!(Some(&result), transaction.results().get(&units[0].id()));
    // 1s after the first poll, 2s after the failed one
    assert_eq!(Duration::from_secs(3), started.elapsed());
}

#[tokio::test(start_paused = true)]
async fn test_drive_gives_up_after_max_tan_attempts() {
    let mut gateway = MockSigningGateway::default();
    let (_, request) = submitted(
        &mut gateway,
        hash_units(1),
        TransactionState::TanRequired,
        tan_challenge(),
    );
    gateway
        .expect_authorize_by_tan()
        .times(2)
        .returning(|_, _, _| Err(GatewayError::TanRejected));
    gateway.expect_get_transaction().never();

    let mut proof_source = MockExternalProofSource::default();
    proof_source
        .expect_tan()
        .times(2)
        .returning(|_, _, _| Ok(SecretString::from("000000".to_string())));

    let service = TransactionService::new(Arc::new(gateway));
    let mut transaction = service.submit(Provider::Bv, request).await.unwrap();

    let result = service
        .drive(
            &mut transaction,
            &proof_source,
            &config(2),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(TransactionError::TanAttemptsExceeded(2))));
    assert_eq!(TransactionState::TanRequired, transaction.state());
}

#[tokio::test(start_paused = true)]
async fn test_drive_page_visit_then_deadline() {
    // given
    let mut gateway = MockSigningGateway::default();
    let (id, request) = submitted(
        &mut gateway,
        hash_units(1),
        TransactionState::PageVisitRequired,
        page_visit_challenge(),
    );
    gateway
        .expect_get_transaction()
        .returning(move |_, _| {
            Ok(snapshot(
                id,
                TransactionState::PageVisitRequired,
                page_visit_challenge(),
                vec![],
            ))
        });

    let (sender, proof_source) = proof_channel(1);
    sender.send(Proof::PageVisited).await.unwrap();

    let service = TransactionService::new(Arc::new(gateway));
    let mut transaction = service.submit(Provider::Bv, request).await.unwrap();

    // when
    let started = tokio::time::Instant::now();
    let result = service
        .drive(
            &mut transaction,
            &proof_source,
            &config(3),
            &CancellationToken::new(),
        )
        .await;

    // then
    assert!(matches!(result, Err(TransactionError::Timeout)));
    assert_eq!(Duration::from_secs(60), started.elapsed());
    assert_eq!(TransactionState::PageVisitRequired, transaction.state());
}

#[tokio::test(start_paused = true)]
async fn test_await_page_visit_times_out() {
    let mut gateway = MockSigningGateway::default();
    let (_, request) = submitted(
        &mut gateway,
        hash_units(1),
        TransactionState::PageVisitRequired,
        page_visit_challenge(),
    );

    // sender kept alive, nothing is ever sent
    let (_sender, proof_source) = proof_channel(1);

    let service = TransactionService::new(Arc::new(gateway));
    let transaction = service.submit(Provider::Bv, request).await.unwrap();

    let result = service
        .await_page_visit(
            &transaction,
            &proof_source,
            Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(TransactionError::Timeout)));
}

#[tokio::test]
async fn test_await_page_visit_is_cancellable() {
    let mut gateway = MockSigningGateway::default();
    let (_, request) = submitted(
        &mut gateway,
        hash_units(1),
        TransactionState::PageVisitRequired,
        page_visit_challenge(),
    );
    let (_sender, proof_source) = proof_channel(1);

    let service = TransactionService::new(Arc::new(gateway));
    let transaction = service.submit(Provider::Bv, request).await.unwrap();

    let cancellation = CancellationToken::new();
    cancellation.cancel();

    let result = service
        .await_page_visit(
            &transaction,
            &proof_source,
            Duration::from_secs(30),
            &cancellation,
        )
        .await;

    assert!(matches!(result, Err(TransactionError::Cancelled)));
}

#[tokio::test]
async fn test_await_page_visit_in_tan_state_is_rejected() {
    let mut gateway = MockSigningGateway::default();
    let (_, request) = submitted(
        &mut gateway,
        hash_units(1),
        TransactionState::TanRequired,
        tan_challenge(),
    );
    let proof_source = MockExternalProofSource::default();

    let service = TransactionService::new(Arc::new(gateway));
    let transaction: Transaction = service.submit(Provider::Bv, request).await.unwrap();

    let result = service
        .await_page_visit(
            &transaction,
            &proof_source,
            Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(TransactionError::InvalidState {
            operation: "awaitPageVisit",
            state: TransactionState::TanRequired,
        })
    ));
}
