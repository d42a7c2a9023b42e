//! Identity Entities
//!
//! The provider owns user records; these are the shapes exchanged with it.
//! Nothing here is persisted locally.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{DisplayName, Email, NewPassword, UserId};

/// Registration payload for a new identity
#[derive(Debug)]
pub struct NewIdentity {
    pub email: Email,
    pub password: NewPassword,
    pub display_name: DisplayName,
}

/// Read-only view of a provider user record
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub user_id: UserId,
    pub email: Option<Email>,
    pub display_name: Option<String>,
    pub disabled: bool,
    /// Tokens authenticated before this instant are revoked
    pub valid_since: Option<DateTime<Utc>>,
}

impl IdentityRecord {
    /// Whether a token authenticated at `auth_time` predates the last revocation
    pub fn has_revoked(&self, auth_time: DateTime<Utc>) -> bool {
        self.valid_since
            .is_some_and(|valid_since| auth_time < valid_since)
    }
}
