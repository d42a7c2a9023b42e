//! Password Policy and Hashing
//!
//! Enforces the input policy, keeps the secret out of logs and out of
//! memory once dropped, and hashes with Argon2id for providers that store
//! credentials locally.
//!
//! The raw bytes are used untouched: no Unicode normalization, no
//! trimming. The provider compares exactly what the user typed.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length accepted by the identity provider
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone`
/// - Debug output is redacted
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
/// assert_eq!(password.expose(), "correct horse");
/// assert!(!format!("{:?}", password).contains("horse"));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password that is about to be set, enforcing the policy:
    /// - 6..=128 code points
    /// - not empty or whitespace-only
    /// - no control characters other than tab and newline
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self(raw);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = candidate.0.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if candidate
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Create a password that is only going to be checked against an
    /// existing credential. Accounts created under an older policy must
    /// still be able to sign in, so only emptiness is rejected.
    pub fn for_verification(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the secret for building an outgoing request body
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with Argon2id (default parameters, random 128-bit salt)
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);

        let hash = Argon2::default()
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Check a password against this hash (constant-time inside argon2)
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub fn as_phc(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("abc12".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 6, actual: 5 }
        );
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defg".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_password_kept_verbatim() {
        // Leading/trailing spaces and full-width characters are part of the secret
        let password = ClearTextPassword::new("  ｐａｓｓ word ".to_string()).unwrap();
        assert_eq!(password.expose(), "  ｐａｓｓ word ");
    }

    #[test]
    fn test_unicode_length_counts_code_points() {
        // 6 code points, 18 bytes
        assert!(ClearTextPassword::new("パスワード安".to_string()).is_ok());
    }

    #[test]
    fn test_for_verification_skips_policy() {
        assert!(ClearTextPassword::for_verification("abc".to_string()).is_ok());
        assert!(ClearTextPassword::for_verification(String::new()).is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("secret-value".to_string()).unwrap();
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }

    #[test]
    fn test_hash_is_argon2id_phc() {
        let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
        let hashed = password.hash().unwrap();

        assert!(hashed.as_phc().starts_with("$argon2id$"));
        assert!(!hashed.as_phc().contains("correct horse"));
        assert!(!format!("{:?}", hashed).contains("argon2id"));
    }

    #[test]
    fn test_hash_verify() {
        let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
        let hashed = password.hash().unwrap();

        let same = ClearTextPassword::for_verification("correct horse".to_string()).unwrap();
        let other = ClearTextPassword::for_verification("battery staple".to_string()).unwrap();
        assert!(hashed.verify(&same));
        assert!(!hashed.verify(&other));
    }

    #[test]
    fn test_hash_is_salted() {
        let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
        assert_ne!(password.hash().unwrap(), password.hash().unwrap());
    }
}
