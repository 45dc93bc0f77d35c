use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "grant_type")]
pub(super) enum TokenRequestDTO {
    #[serde(rename = "client_credentials")]
    ClientCredentials,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDTO {
    pub access_token: SecretString,
    pub token_type: String,
    pub expires_in: i64,
}
