//! Password Value Objects
//!
//! Domain wrappers over `platform::password::ClearTextPassword`.
//! Two flavors: a password being set (policy enforced) and a password
//! offered at sign-in (only checked for presence).

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};

use super::ValidationError;

/// Password about to be stored by the provider
pub struct NewPassword(ClearTextPassword);

impl NewPassword {
    pub fn new(raw: String) -> Result<Self, ValidationError> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub(crate) fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        self.0.hash()
    }
}

/// Password offered for sign-in
pub struct LoginPassword(ClearTextPassword);

impl LoginPassword {
    pub fn new(raw: String) -> Result<Self, ValidationError> {
        Ok(Self(ClearTextPassword::for_verification(raw)?))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub(crate) fn matches(&self, hashed: &HashedPassword) -> bool {
        hashed.verify(&self.0)
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NewPassword").field(&"[REDACTED]").finish()
    }
}

impl fmt::Debug for LoginPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LoginPassword").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::PasswordPolicyError;

    #[test]
    fn test_new_password_policy() {
        let err = NewPassword::new("12345".to_string()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Password(PasswordPolicyError::TooShort { .. })
        ));
        assert!(NewPassword::new("hunter22".to_string()).is_ok());
    }

    #[test]
    fn test_login_password_accepts_legacy() {
        assert!(LoginPassword::new("abc".to_string()).is_ok());
        assert!(LoginPassword::new(String::new()).is_err());
    }

    #[test]
    fn test_login_password_matches_new_password_hash() {
        let hashed = NewPassword::new("hunter22".to_string()).unwrap().hash().unwrap();
        assert!(LoginPassword::new("hunter22".to_string()).unwrap().matches(&hashed));
        assert!(!LoginPassword::new("hunter23".to_string()).unwrap().matches(&hashed));
    }

    #[test]
    fn test_debug_redaction() {
        let password = NewPassword::new("topsecret".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("topsecret"));
    }
}
