pub mod key;
pub mod key_helpers;
pub mod provider;
pub mod resolver;
pub mod web;
