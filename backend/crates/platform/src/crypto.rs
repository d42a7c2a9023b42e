//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random opaque token, URL-safe base64 without padding
pub fn random_token(byte_len: usize) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes(byte_len))
}
