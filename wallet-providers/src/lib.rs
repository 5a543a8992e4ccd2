//! Protocol-level building blocks of the wallet: key algorithms, DID methods with a caching
//! resolver, credential proof formats, the multi-recipient JWE envelope and storage traits.

pub mod cache_storage;
pub mod caching_loader;
pub mod common_models;
pub mod credential_formatter;
pub mod did;
pub mod jwe;
pub mod key_algorithm;
pub mod storage;
pub mod util;
