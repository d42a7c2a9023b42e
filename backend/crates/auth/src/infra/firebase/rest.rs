//! Identity Toolkit / Secure Token REST plumbing
//!
//! Every endpoint reports failures as
//! `{"error": {"code": 400, "message": "CODE : detail"}}`.

use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::value_object::ValidationError;
use crate::error::{AuthError, AuthResult};

/// Which call produced the error; some codes mean different things per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Admin,
    SignIn,
    RefreshToken,
    PasswordReset,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Split `"WEAK_PASSWORD : Password should be at least 6 characters"`
fn split_message(message: &str) -> (&str, Option<&str>) {
    match message.split_once(':') {
        Some((code, detail)) => (code.trim(), Some(detail.trim()).filter(|d| !d.is_empty())),
        None => (message.trim(), None),
    }
}

/// Map a provider error message to a domain error
pub(crate) fn map_error(endpoint: Endpoint, status: u16, message: &str) -> AuthError {
    let (code, detail) = split_message(message);

    match code {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => AuthError::EmailTaken,
        "WEAK_PASSWORD" | "INVALID_EMAIL" | "INVALID_DISPLAY_NAME" => {
            AuthError::Validation(ValidationError::Provider(
                detail.unwrap_or(code).to_string(),
            ))
        }
        "EMAIL_NOT_FOUND" if endpoint == Endpoint::SignIn => AuthError::InvalidCredentials,
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => AuthError::UserNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
        "USER_DISABLED" => AuthError::UserDisabled,
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => AuthError::InvalidRefreshToken,
        "MISSING_REFRESH_TOKEN" if endpoint == Endpoint::RefreshToken => {
            AuthError::InvalidRefreshToken
        }
        "INVALID_ID_TOKEN" => AuthError::InvalidIdToken,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
        other => AuthError::Idp {
            status,
            code: other.to_string(),
        },
    }
}

/// Decode a success body, or map the error envelope
pub(crate) async fn read_json<T>(endpoint: Endpoint, response: Response) -> AuthResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("HTTP_{}", status.as_u16()));

        tracing::debug!(
            ?endpoint,
            status = status.as_u16(),
            message = %message,
            "Identity provider returned an error"
        );

        return Err(map_error(endpoint, status.as_u16(), &message));
    }

    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(?endpoint, error = %e, "Unexpected identity provider response");
        AuthError::Idp {
            status: status.as_u16(),
            code: "UNEXPECTED_RESPONSE".to_string(),
        }
    })
}

/// Discard a success body, or map the error envelope
pub(crate) async fn expect_success(endpoint: Endpoint, response: Response) -> AuthResult<()> {
    read_json::<serde_json::Value>(endpoint, response)
        .await
        .map(|_| ())
}
