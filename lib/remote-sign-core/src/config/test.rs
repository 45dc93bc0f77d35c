use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use similar_asserts::assert_eq;

use super::ConfigurationError;
use super::core_config::{AppConfig, NoCustomConfig, PollingConfig};
use crate::model::algorithm::Provider;

const BASE_CONFIG: &str = r#"
gateway:
  url: "https://datasign.example.com/api"
  oauth:
    issuerUri: "https://keycloak.example.com/realms/datasign"
    clientId: "cookbook"
    clientSecret: "secret"
provider:
  BV:
    enabled: true
  DTRUST: {}
  STORED_KEYS:
    enabled: false
"#;

#[test]
fn test_parse_base_config_with_defaults() {
    let config = AppConfig::<NoCustomConfig>::from_yaml([BASE_CONFIG]).unwrap();

    assert_eq!(
        "https://datasign.example.com/api",
        config.core.gateway.url.as_str()
    );
    assert_eq!("cookbook", config.core.gateway.oauth.client_id);
    assert_eq!("secret", config.core.gateway.oauth.client_secret.expose_secret());
    assert_eq!(PollingConfig::default(), config.core.transaction.polling);
    assert_eq!(3, config.core.transaction.max_tan_attempts);
    assert_eq!(None, config.core.timestamp.provider);
}

#[test]
fn test_provider_enablement() {
    let config = AppConfig::<NoCustomConfig>::from_yaml([BASE_CONFIG]).unwrap();
    let providers = &config.core.provider;

    assert!(providers.get_enabled(Provider::Bv).is_ok());
    assert!(providers.get_enabled(Provider::Dtrust).is_ok());
    assert_eq!(
        Some(ConfigurationError::ProviderDisabled(Provider::StoredKeys)),
        providers.get_enabled(Provider::StoredKeys).err()
    );
}

#[test]
fn test_unconfigured_provider() {
    let config = AppConfig::<NoCustomConfig>::from_yaml([r#"
gateway:
  url: "https://datasign.example.com"
  oauth:
    issuerUri: "https://keycloak.example.com"
    clientId: "id"
    clientSecret: "secret"
provider:
  BV: {}
"#])
    .unwrap();

    assert_eq!(
        Some(ConfigurationError::ProviderNotConfigured(Provider::Dtrust)),
        config.core.provider.get_enabled(Provider::Dtrust).err()
    );
}

#[test]
fn test_later_sources_override_earlier() {
    let config = AppConfig::<NoCustomConfig>::from_yaml([
        BASE_CONFIG,
        r#"
transaction:
  polling:
    initialInterval: 2
    maxInterval: 20
    multiplier: 1.5
    deadline: 60
  pageVisitTimeout: 30
  maxTanAttempts: 5
timestamp:
  provider: "DTRUST_TSA"
"#,
    ])
    .unwrap();

    let transaction = config.core.transaction;
    assert_eq!(Duration::from_secs(2), transaction.polling.initial_interval);
    assert_eq!(Duration::from_secs(20), transaction.polling.max_interval);
    assert_eq!(1.5, transaction.polling.multiplier);
    assert_eq!(Duration::from_secs(60), transaction.polling.deadline);
    assert_eq!(Duration::from_secs(30), transaction.page_visit_timeout);
    assert_eq!(5, transaction.max_tan_attempts);
    assert_eq!(Some("DTRUST_TSA".to_string()), config.core.timestamp.provider);
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliConfig {
    trace_level: Option<String>,
    seal_id: Option<String>,
}

#[test]
fn test_custom_app_section() {
    let config = AppConfig::<CliConfig>::from_yaml([
        BASE_CONFIG,
        r#"
app:
  traceLevel: "info"
  sealId: "seal-1"
"#,
    ])
    .unwrap();

    assert_eq!(Some("info".to_string()), config.app.trace_level);
    assert_eq!(Some("seal-1".to_string()), config.app.seal_id);
}

#[test]
fn test_missing_gateway_fails() {
    let result = AppConfig::<NoCustomConfig>::from_yaml(["provider:\n  BV: {}\n"]);

    assert!(result.is_err());
}

#[test]
fn test_unsupported_file_extension() {
    let result = AppConfig::<NoCustomConfig>::from_files(&["config.toml"]);

    assert!(result.is_err());
}
