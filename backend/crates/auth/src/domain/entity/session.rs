//! Session Entities

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::value_object::{IdToken, RefreshToken, UserId};

/// Token pair issued by the provider on sign-in or refresh
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub id_token: IdToken,
    pub refresh_token: RefreshToken,
    /// Remaining lifetime of the ID token
    pub expires_in: Duration,
}

/// Claims of an ID token whose signature and lifetime were checked
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub user_id: UserId,
    /// When the user last authenticated with credentials
    pub auth_time: DateTime<Utc>,
}
