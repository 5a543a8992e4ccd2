pub mod sha256;
