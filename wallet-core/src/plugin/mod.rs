//! Plugins bundled with the wallet.
//!
//! [`did_key`] and [`signing`] hold the key material. [`vc`], [`encryption`] and
//! [`expiration`] build on top of them through the wallet. The remaining modules adapt
//! external collaborators reached through traits or HTTP.

pub mod chapi;
pub mod claimable_boosts;
pub mod did_key;
pub mod encryption;
pub mod expiration;
pub mod signing;
pub mod signing_authority;
pub mod vc;
pub mod vc_api;

#[cfg(test)]
pub(crate) mod test_utilities;
