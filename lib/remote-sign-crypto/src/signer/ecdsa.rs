use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use secrecy::{ExposeSecret, SecretSlice};

use crate::utilities::get_rng;
use crate::{Signer, SignerError};

pub const ECDSA_ID: &str = "ECDSA";
pub const PLAIN_ECDSA_ID: &str = "PLAIN_ECDSA";

/// Output encoding of an ECDSA signature value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignatureEncoding {
    /// ASN.1 DER `Ecdsa-Sig-Value`
    #[default]
    Der,
    /// Fixed-size `r || s` concatenation
    Plain,
}

/// ECDSA on the NIST P-256 curve over a caller-supplied digest
#[derive(Clone, Copy, Debug, Default)]
pub struct ECDSASigner {
    encoding: SignatureEncoding,
}

pub struct KeyPair {
    pub public: Vec<u8>,
    pub private: SecretSlice<u8>,
}

impl ECDSASigner {
    pub fn plain() -> Self {
        Self {
            encoding: SignatureEncoding::Plain,
        }
    }

    pub fn encoding(&self) -> SignatureEncoding {
        self.encoding
    }

    /// Generates a key pair, the public key in compressed SEC1 form
    pub fn generate_key_pair() -> KeyPair {
        let signing_key = SigningKey::random(&mut get_rng());
        let public = signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();

        KeyPair {
            public,
            private: signing_key.to_bytes().to_vec().into(),
        }
    }

    pub fn parse_public_key(public_key: &[u8]) -> Result<VerifyingKey, SignerError> {
        VerifyingKey::from_sec1_bytes(public_key)
            .map_err(|e| SignerError::CouldNotExtractPublicKey(e.to_string()))
    }

    /// Accepts both DER and plain encodings
    pub fn parse_signature(signature: &[u8]) -> Result<Signature, SignerError> {
        Signature::from_der(signature)
            .or_else(|_| Signature::from_slice(signature))
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))
    }
}

impl Signer for ECDSASigner {
    fn sign(
        &self,
        digest: &[u8],
        public_key: &[u8],
        private_key: &SecretSlice<u8>,
    ) -> Result<Vec<u8>, SignerError> {
        let signing_key = SigningKey::from_slice(private_key.expose_secret())
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;

        let expected_public = Self::parse_public_key(public_key)?;
        if signing_key.verifying_key() != &expected_public {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        let signature: Signature = signing_key
            .sign_prehash(digest)
            .map_err(|e| SignerError::CouldNotSign(e.to_string()))?;

        Ok(match self.encoding {
            SignatureEncoding::Der => signature.to_der().as_bytes().to_vec(),
            SignatureEncoding::Plain => signature.to_bytes().to_vec(),
        })
    }

    fn verify(
        &self,
        digest: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<(), SignerError> {
        let verifying_key = Self::parse_public_key(public_key)?;
        let signature = Self::parse_signature(signature)?;

        verifying_key
            .verify_prehash(digest, &signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}
