//! Display Name Value Object
//!
//! Free-form human name shown by the provider. NFKC-normalized so that
//! full-width and compatibility forms collapse to one spelling.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

use super::ValidationError;

pub const DISPLAY_NAME_MAX_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::DisplayName("cannot be empty"));
        }

        if trimmed.chars().count() > DISPLAY_NAME_MAX_LENGTH {
            return Err(ValidationError::DisplayName("longer than 256 characters"));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::DisplayName("contains control characters"));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// "First Last", skipping an empty part
    pub fn from_parts(first_name: &str, last_name: &str) -> Result<Self, ValidationError> {
        let joined = [first_name.trim(), last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self::new(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
