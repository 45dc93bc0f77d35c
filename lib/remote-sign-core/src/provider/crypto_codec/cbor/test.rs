use std::sync::Arc;

use mockall::predicate::eq;
use remote_sign_crypto::{CryptoProviderImpl, Hasher, MockCryptoProvider, MockHasher};
use rstest::rstest;
use similar_asserts::assert_eq;

use super::CborContainerCodec;
use crate::model::algorithm::{
    AlgorithmParameters, EncryptionAlgorithm, HashAlgorithm, SignatureAlgorithm, SignatureLevel,
    SignaturePackaging,
};
use crate::model::transaction::ValidationData;
use crate::provider::crypto_codec::model::{Indication, SignatureInput};
use crate::provider::crypto_codec::{CodecError, CryptoCodec};
use crate::service::test_utilities::{ProviderKey, codec, ecdsa_parameters};

const CONTENT: &[u8] = b"%PDF-1.7 sample document";

fn signed_value(
    key: &ProviderKey,
    parameters: AlgorithmParameters,
    content: &[u8],
) -> (Vec<u8>, Vec<u8>) {
    let dtbs = codec()
        .data_to_be_signed(content, &key.context(parameters))
        .unwrap();
    let value = key.sign(&dtbs, parameters.hash_algorithm);
    (dtbs, value)
}

#[rstest]
#[case(SignaturePackaging::Detached)]
#[case(SignaturePackaging::Enveloping)]
#[case(SignaturePackaging::Enveloped)]
fn test_incorporated_value_validates(#[case] packaging: SignaturePackaging) {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(packaging, SignatureLevel::BB);
    let (dtbs, value) = signed_value(&key, parameters, CONTENT);

    let context = key.context(parameters);
    assert!(codec.is_valid_signature_value(&dtbs, &value, &context).unwrap());

    let signed = codec
        .incorporate(
            CONTENT,
            &context,
            &SignatureInput::Value {
                value,
                timestamp: Some(b"timestamp-token".to_vec()),
            },
        )
        .unwrap();

    assert_eq!(Indication::Ok, codec.validate(CONTENT, &signed).unwrap());
}

#[test]
fn test_plain_ecdsa_value_validates() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = AlgorithmParameters {
        signature_algorithm: SignatureAlgorithm::PlainEcdsaSha384,
        hash_algorithm: HashAlgorithm::Sha384,
        encryption_algorithm: EncryptionAlgorithm::PlainEcdsa,
        ..ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB)
    };
    let (dtbs, value) = signed_value(&key, parameters, CONTENT);

    assert!(
        codec
            .is_valid_signature_value(&dtbs, &value, &key.context(parameters))
            .unwrap()
    );
}

#[test]
fn test_value_over_other_content_is_rejected() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB);
    let (_, value) = signed_value(&key, parameters, b"other content");

    let dtbs = codec
        .data_to_be_signed(CONTENT, &key.context(parameters))
        .unwrap();

    assert!(
        !codec
            .is_valid_signature_value(&dtbs, &value, &key.context(parameters))
            .unwrap()
    );
}

#[test]
fn test_detached_container_against_modified_content() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB);
    let cms = key.cms_signed_data(CONTENT, parameters);

    assert_eq!(Indication::Ok, codec.validate(CONTENT, &cms).unwrap());
    assert_eq!(
        Indication::TotalFailed,
        codec.validate(b"tampered document", &cms).unwrap()
    );
}

#[test]
fn test_cms_incorporated_into_document() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Enveloped, SignatureLevel::BB);
    let cms = key.cms_signed_data(CONTENT, parameters);

    let signed = codec
        .incorporate(
            CONTENT,
            &key.context(parameters),
            &SignatureInput::CmsSignedData(cms),
        )
        .unwrap();

    assert_eq!(Indication::Ok, codec.validate(CONTENT, &signed).unwrap());
    assert_eq!(
        Indication::TotalFailed,
        codec.validate(b"another document", &signed).unwrap()
    );
}

#[test]
fn test_not_a_signature() {
    assert_eq!(
        Indication::NoSignatureFound,
        codec().validate(CONTENT, b"plain bytes").unwrap()
    );
}

#[test]
fn test_signature_by_other_key() {
    let codec = codec();
    let key = ProviderKey::generate();
    let other = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB);
    let (_, value) = signed_value(&other, parameters, CONTENT);

    let signed = codec
        .incorporate(
            CONTENT,
            &key.context(parameters),
            &SignatureInput::Value {
                value,
                timestamp: None,
            },
        )
        .unwrap();

    assert_eq!(
        Indication::TotalFailed,
        codec.validate(CONTENT, &signed).unwrap()
    );
}

#[test]
fn test_missing_certificate_is_indeterminate() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB);
    let (_, value) = signed_value(&key, parameters, CONTENT);

    let mut context = key.context(parameters);
    context.signing_certificate = None;
    let signed = codec
        .incorporate(
            CONTENT,
            &context,
            &SignatureInput::Value {
                value,
                timestamp: None,
            },
        )
        .unwrap();

    assert_eq!(
        Indication::Indeterminate,
        codec.validate(CONTENT, &signed).unwrap()
    );
}

#[test]
fn test_extension_is_idempotent() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Enveloped, SignatureLevel::BLt);
    let (_, value) = signed_value(&key, parameters, CONTENT);
    let signed = codec
        .incorporate(
            CONTENT,
            &key.context(parameters),
            &SignatureInput::Value {
                value,
                timestamp: None,
            },
        )
        .unwrap();

    let validation_data = ValidationData {
        certificate_chain: vec![key.public.clone(), b"root".to_vec()],
        ocsp: vec![b"ocsp-response".to_vec()],
        crl: vec![],
    };

    let once = codec
        .extend_with_validation_data(&signed, &validation_data)
        .unwrap();
    let twice = codec
        .extend_with_validation_data(&once, &validation_data)
        .unwrap();

    assert_ne!(signed, once);
    assert_eq!(once, twice);
    assert_eq!(Indication::Ok, codec.validate(CONTENT, &twice).unwrap());
}

#[test]
fn test_rsa_is_unsupported() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = AlgorithmParameters {
        signature_algorithm: SignatureAlgorithm::RsaWithMgf1Sha256,
        encryption_algorithm: EncryptionAlgorithm::RsassaPss,
        ..ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB)
    };

    let result = codec.is_valid_signature_value(b"dtbs", b"value", &key.context(parameters));

    assert!(matches!(
        result,
        Err(CodecError::UnsupportedAlgorithm(
            SignatureAlgorithm::RsaWithMgf1Sha256
        ))
    ));
}

#[test]
fn test_garbage_certificate() {
    let codec = codec();
    let key = ProviderKey::generate();
    let parameters = ecdsa_parameters(SignaturePackaging::Detached, SignatureLevel::BB);
    let mut context = key.context(parameters);
    context.signing_certificate = Some(b"not a certificate".to_vec());

    let result = codec.is_valid_signature_value(b"dtbs", b"value", &context);

    assert!(matches!(result, Err(CodecError::InvalidCertificate(_))));
}

#[test]
fn test_digest_uses_crypto_provider() {
    let mut hasher = MockHasher::default();
    hasher
        .expect_hash()
        .with(eq(b"content".as_slice()))
        .once()
        .returning(|_| Ok(vec![1, 2, 3]));
    let hasher: Arc<dyn Hasher> = Arc::new(hasher);

    let mut crypto = MockCryptoProvider::default();
    crypto
        .expect_get_hasher()
        .with(eq("sha-384"))
        .once()
        .returning(move |_| Ok(hasher.clone()));

    let codec = CborContainerCodec::new(Arc::new(crypto));

    assert_eq!(
        vec![1, 2, 3],
        codec.digest(HashAlgorithm::Sha384, b"content").unwrap()
    );
}

#[test]
fn test_data_to_be_signed_is_deterministic() {
    let codec = CborContainerCodec::new(Arc::new(CryptoProviderImpl::default()));
    let key = ProviderKey::generate();
    let context = key.context(ecdsa_parameters(
        SignaturePackaging::Detached,
        SignatureLevel::BB,
    ));

    assert_eq!(
        codec.data_to_be_signed(CONTENT, &context).unwrap(),
        codec.data_to_be_signed(CONTENT, &context).unwrap()
    );
}
