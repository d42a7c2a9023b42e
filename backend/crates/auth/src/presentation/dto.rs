//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::Session;

// ============================================================================
// Users
// ============================================================================

/// Create user request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Resolved identity response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub uid: String,
}

/// Attribute update request; the field name comes from the path
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeRequest {
    pub value: String,
}

/// Password reset request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

// ============================================================================
// Sessions
// ============================================================================

/// Log in request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSessionRequest {
    pub refresh_token: String,
}

/// Token pair response
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds until the ID token expires
    pub expires_in: u64,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id_token: session.id_token.into_string(),
            refresh_token: session.refresh_token.into_string(),
            expires_in: session.expires_in.as_secs(),
        }
    }
}

/// Log out response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogOutResponse {
    pub success: bool,
}
