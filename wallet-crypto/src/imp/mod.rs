use std::{collections::HashMap, sync::Arc};

use super::{CryptoProvider, CryptoProviderError, Hasher, Signer};

pub mod encryption;
pub mod hasher;
pub mod signer;
pub mod utilities;


/// [`CryptoProvider`] over fixed name to implementation maps.
#[derive(Clone)]
pub struct CryptoProviderImpl {
    hashers: HashMap<String, Arc<dyn Hasher>>,
    signers: HashMap<String, Arc<dyn Signer>>,
}

impl CryptoProviderImpl {
    pub fn new(
        hashers: HashMap<String, Arc<dyn Hasher>>,
        signers: HashMap<String, Arc<dyn Signer>>,
    ) -> Self {
        Self { hashers, signers }
    }
}

impl CryptoProvider for CryptoProviderImpl {
    fn get_hasher(&self, name: &str) -> Result<Arc<dyn Hasher>, CryptoProviderError> {
        self.hashers
            .get(name)
            .cloned()
            .ok_or_else(|| CryptoProviderError::MissingHasher(name.to_owned()))
    }

    fn get_signer(&self, name: &str) -> Result<Arc<dyn Signer>, CryptoProviderError> {
        self.signers
            .get(name)
            .cloned()
            .ok_or_else(|| CryptoProviderError::MissingSigner(name.to_owned()))
    }
}
