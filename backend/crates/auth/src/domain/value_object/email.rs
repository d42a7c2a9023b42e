//! Email Value Object
//!
//! The provider treats emails case-insensitively and stores them
//! lower-cased, so the canonical form here is lower-case as well.

use serde::Serialize;
use std::str::FromStr;

use super::ValidationError;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local-part length (per RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(ValidationError::Email("cannot be empty"));
        }

        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(ValidationError::Email("longer than 254 characters"));
        }

        check_format(&email).map_err(ValidationError::Email)?;

        Ok(Self(email))
    }

    /// Wrap an email reported by the provider (already canonical)
    pub(crate) fn from_provider(email: impl Into<String>) -> Self {
        Self(email.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part, for log fields that should not carry the full address
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or("")
    }
}

fn check_format(email: &str) -> Result<(), &'static str> {
    let (local, domain) = email.split_once('@').ok_or("missing '@'")?;

    if domain.contains('@') {
        return Err("more than one '@'");
    }

    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
        return Err("local part must be 1 to 64 characters");
    }

    if local.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("local part contains whitespace");
    }

    if domain.is_empty() || !domain.contains('.') {
        return Err("domain must contain a dot");
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err("domain contains invalid characters");
    }

    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) || domain.contains("..") {
        return Err("domain is malformed");
    }

    Ok(())
}

impl FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
