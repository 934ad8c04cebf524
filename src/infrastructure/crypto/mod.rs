//! Cryptographic primitives: password digests and session tokens.

pub mod jwt;
pub mod password;
