use rand::{CryptoRng, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub fn get_rng() -> impl rand::RngCore + CryptoRng {
    ChaCha20Rng::from_entropy()
}
