pub mod crypto_codec;
pub mod gateway;
pub mod http_client;
pub mod oauth;
pub mod proof;
