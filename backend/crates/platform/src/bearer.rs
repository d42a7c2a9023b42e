//! Bearer token extraction
//!
//! Reads `Authorization: Bearer <token>` from request headers.

use axum::http::{HeaderMap, header};

/// Error when extracting a bearer token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not a Bearer credential")]
    InvalidScheme,
}

/// Extract the bearer token from request headers
///
/// The scheme is matched case-insensitively (RFC 7235); surrounding
/// whitespace around the token is ignored.
///
/// ## Returns
/// * `Ok(String)` - The token, without the scheme
/// * `Err(BearerError)` - Header absent, or not a Bearer credential
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(BearerError::MissingHeader)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(BearerError::InvalidScheme)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::InvalidScheme);
    }

    // The header was trimmed, so whatever follows the separator is non-empty
    Ok(token.trim().to_string())
}
