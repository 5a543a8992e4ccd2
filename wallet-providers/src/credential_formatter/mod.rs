//! Proof formats for credentials and presentations.
//!
//! Two envelopes are supported:
//! - embedded Data Integrity proofs using JCS canonicalization (`eddsa-jcs-2022`,
//!   `ecdsa-jcs-2019`), see [`imp::data_integrity`];
//! - compact VC-JWT and VP-JWT tokens, see [`imp::jwt_formatter`].
//!
//! Signing goes through a [`model::SignatureProvider`] so private keys never reach this module.
//! Verification goes through a [`model::TokenVerifier`], typically
//! [`crate::util::key_verification::DocumentKeyVerifier`].

pub mod error;
pub mod imp;
pub mod model;
