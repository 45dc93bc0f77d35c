#![cfg_attr(feature = "strict", deny(warnings))]

use remote_sign_core::model::algorithm::{Provider, SignatureLevel, SignatureNiveau};
use serde::Deserialize;

pub mod command;
pub mod console;

/// `app` section of the configuration files
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    pub trace_level: Option<String>,
    pub trace_json: Option<bool>,
    pub provider: Option<Provider>,
    pub seal_id: Option<String>,
    pub user_id: Option<String>,
    pub niveau: Option<SignatureNiveau>,
    pub level: Option<SignatureLevel>,
}
