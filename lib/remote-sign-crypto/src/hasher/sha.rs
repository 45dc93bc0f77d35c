use ct_codecs::{Base64, Encoder};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::{Hasher, HasherError};

pub const SHA256_ID: &str = "sha-256";
pub const SHA384_ID: &str = "sha-384";
pub const SHA512_ID: &str = "sha-512";

pub struct SHA256;
pub struct SHA384;
pub struct SHA512;

fn encode(digest: &[u8]) -> Result<String, HasherError> {
    Base64::encode_to_string(digest).map_err(|e| HasherError::CouldNotEncode(e.to_string()))
}

impl Hasher for SHA256 {
    fn hash(&self, input: &[u8]) -> Result<Vec<u8>, HasherError> {
        Ok(Sha256::digest(input).to_vec())
    }

    fn hash_base64(&self, input: &[u8]) -> Result<String, HasherError> {
        encode(&self.hash(input)?)
    }
}

impl Hasher for SHA384 {
    fn hash(&self, input: &[u8]) -> Result<Vec<u8>, HasherError> {
        Ok(Sha384::digest(input).to_vec())
    }

    fn hash_base64(&self, input: &[u8]) -> Result<String, HasherError> {
        encode(&self.hash(input)?)
    }
}

impl Hasher for SHA512 {
    fn hash(&self, input: &[u8]) -> Result<Vec<u8>, HasherError> {
        Ok(Sha512::digest(input).to_vec())
    }

    fn hash_base64(&self, input: &[u8]) -> Result<String, HasherError> {
        encode(&self.hash(input)?)
    }
}
