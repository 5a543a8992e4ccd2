use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::encryption::{KEY_LENGTH, NONCE_LENGTH};

pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut rng = ChaCha20Rng::from_entropy();
    let mut bytes = [0u8; N];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Random content encryption key for XChaCha20-Poly1305.
pub fn generate_content_key() -> [u8; KEY_LENGTH] {
    generate_random_bytes::<KEY_LENGTH>()
}

pub fn generate_xnonce() -> [u8; NONCE_LENGTH] {
    generate_random_bytes::<NONCE_LENGTH>()
}
