use crate::{CryptoProvider, CryptoProviderError, CryptoProviderImpl};

#[test]
fn test_default_provider_knows_sha_family() {
    let provider = CryptoProviderImpl::default();

    for id in ["sha-256", "sha-384", "sha-512"] {
        assert!(provider.get_hasher(id).is_ok(), "{id}");
    }
}

#[test]
fn test_default_provider_knows_ecdsa() {
    let provider = CryptoProviderImpl::default();

    assert!(provider.get_signer("ECDSA").is_ok());
    assert!(provider.get_signer("PLAIN_ECDSA").is_ok());
}

#[test]
fn test_missing_signer() {
    let provider = CryptoProviderImpl::default();

    assert_eq!(
        Some(CryptoProviderError::MissingSigner("RSA".to_string())),
        provider.get_signer("RSA").err()
    );
}
