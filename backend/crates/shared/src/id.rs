//! Opaque ID Types
//!
//! Type-safe wrappers for identifiers assigned by an external system.
//! The value is never parsed or generated locally, only carried.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Maximum accepted identifier length
pub const OPAQUE_ID_MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("Identifier cannot be empty")]
    Empty,

    #[error("Identifier must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Generic typed opaque ID
///
/// Usage:
/// ```
/// use kernel::id::Id;
///
/// struct Account;
/// type AccountId = Id<Account>;
///
/// let id = AccountId::new("kXf3p9").unwrap();
/// assert_eq!(id.as_str(), "kXf3p9");
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(IdError::Empty);
        }

        let actual = value.chars().count();
        if actual > OPAQUE_ID_MAX_LENGTH {
            return Err(IdError::TooLong {
                max: OPAQUE_ID_MAX_LENGTH,
                actual,
            });
        }

        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

// Manual impls: derives would put bounds on `T`.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Id::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    type TestId = Id<Marker>;

    #[test]
    fn test_id_rejects_empty() {
        assert_eq!(TestId::new("").unwrap_err(), IdError::Empty);
        assert_eq!(TestId::new("   ").unwrap_err(), IdError::Empty);
    }

    #[test]
    fn test_id_rejects_too_long() {
        let long = "x".repeat(OPAQUE_ID_MAX_LENGTH + 1);
        assert!(matches!(
            TestId::new(long),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_id_equality_and_display() {
        let a = TestId::new("uid-1").unwrap();
        let b = TestId::new("uid-1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "uid-1");
    }

    #[test]
    fn test_id_serde() {
        let id = TestId::new("uid-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"uid-1\"");

        let back: TestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<TestId>("\"\"").is_err());
    }
}
