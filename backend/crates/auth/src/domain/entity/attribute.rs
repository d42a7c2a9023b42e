//! Attribute Update
//!
//! One named field of an identity, with its validated new value.
//! The set of updatable fields is closed; anything else is rejected
//! before a request reaches the provider.

use std::fmt;
use std::str::FromStr;

use crate::domain::value_object::{DisplayName, Email, NewPassword};
use crate::error::{AuthError, AuthResult};

/// Updatable identity fields, named as the provider names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    Email,
    Password,
    DisplayName,
}

impl AttributeField {
    pub const ALL: [AttributeField; 3] = [
        AttributeField::Email,
        AttributeField::Password,
        AttributeField::DisplayName,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            AttributeField::Email => "email",
            AttributeField::Password => "password",
            AttributeField::DisplayName => "displayName",
        }
    }
}

impl FromStr for AttributeField {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| AuthError::UnknownAttribute(s.to_string()))
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-field identity update
#[derive(Debug)]
pub enum AttributeUpdate {
    Email(Email),
    Password(NewPassword),
    DisplayName(DisplayName),
}

impl AttributeUpdate {
    /// Build from a field name and raw value, validating both
    pub fn parse(field: &str, value: String) -> AuthResult<Self> {
        let update = match field.parse::<AttributeField>()? {
            AttributeField::Email => AttributeUpdate::Email(Email::new(value)?),
            AttributeField::Password => AttributeUpdate::Password(NewPassword::new(value)?),
            AttributeField::DisplayName => AttributeUpdate::DisplayName(DisplayName::new(value)?),
        };
        Ok(update)
    }

    pub fn field(&self) -> AttributeField {
        match self {
            AttributeUpdate::Email(_) => AttributeField::Email,
            AttributeUpdate::Password(_) => AttributeField::Password,
            AttributeUpdate::DisplayName(_) => AttributeField::DisplayName,
        }
    }
}
