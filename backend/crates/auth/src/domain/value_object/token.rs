//! Session token value objects
//!
//! Both tokens are opaque bearer credentials minted by the provider.
//! Their content is never logged.

use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Short-lived ID token proving the identity of the caller
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken(String);

impl IdToken {
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AuthError::InvalidIdToken);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Longer-lived refresh token, revocable in bulk per identity
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AuthError::InvalidRefreshToken);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdToken").field(&"[REDACTED]").finish()
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}
