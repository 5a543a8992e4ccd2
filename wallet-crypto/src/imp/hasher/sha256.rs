use ct_codecs::{Base64UrlSafeNoPadding, Encoder};
use sha2::{Digest, Sha256};

use crate::{Hasher, HasherError};

pub struct SHA256 {}

impl Hasher for SHA256 {
    fn hash(&self, input: &[u8]) -> Result<Vec<u8>, HasherError> {
        Ok(Sha256::digest(input).to_vec())
    }

    fn hash_base64(&self, input: &[u8]) -> Result<String, HasherError> {
        Base64UrlSafeNoPadding::encode_to_string(Sha256::digest(input))
            .map_err(|_| HasherError::CouldNotHash)
    }
}
