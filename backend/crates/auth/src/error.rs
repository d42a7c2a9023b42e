//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Facade operations never let a provider failure escape bare: they wrap
//! it with a fixed, human-readable context ([`AuthError::Context`]) and
//! log it once at that point. Kind, status and code are always taken from
//! the innermost cause.

use std::borrow::Cow;

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::ValidationError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential material or client configuration unusable at startup
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// No usable `Authorization: Bearer` header
    #[error("Missing or malformed bearer token")]
    MissingBearerToken,

    /// ID token malformed, expired, or not signed by the provider
    #[error("Invalid or expired ID token")]
    InvalidIdToken,

    /// ID token issued before the identity's tokens were revoked
    #[error("ID token has been revoked")]
    TokenRevoked,

    /// Refresh token unknown, expired or revoked
    #[error("Invalid or revoked refresh token")]
    InvalidRefreshToken,

    /// Wrong password, or no account for that email
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input rejected before reaching the provider, or by the provider
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Attribute name outside {email, password, displayName}
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Email already registered
    #[error("Email already in use")]
    EmailTaken,

    /// No identity for the given identifier or email
    #[error("User not found")]
    UserNotFound,

    /// Identity exists but is disabled
    #[error("User account is disabled")]
    UserDisabled,

    /// Provider-side throttling
    #[error("Too many attempts, try again later")]
    TooManyAttempts,

    /// Provider could not be reached
    #[error("Identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with an error this service does not classify
    #[error("Identity provider error {status}: {code}")]
    Idp { status: u16, code: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// A failure wrapped with the fixed message of the operation it broke
    #[error("{context}: {source}")]
    Context {
        context: Cow<'static, str>,
        #[source]
        source: Box<AuthError>,
    },
}

impl AuthError {
    /// Wrap with a fixed operation message and log the failure once
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Self {
        let context = context.into();

        // Already logged where the inner context was attached
        if matches!(self, AuthError::Context { .. }) {
            tracing::debug!(context = %context, error = %self, "Identity operation failed");
        } else if self.kind().is_server_error() {
            tracing::error!(context = %context, error = %self, "Identity operation failed");
        } else {
            tracing::warn!(context = %context, error = %self, "Identity operation rejected");
        }

        AuthError::Context {
            context,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping context layers
    pub fn root_cause(&self) -> &AuthError {
        match self {
            AuthError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Initialization(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
            AuthError::MissingBearerToken
            | AuthError::InvalidIdToken
            | AuthError::TokenRevoked
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Validation(_) | AuthError::UnknownAttribute(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UserDisabled => ErrorKind::Forbidden,
            AuthError::TooManyAttempts => ErrorKind::TooManyRequests,
            AuthError::Transport(_) => ErrorKind::ServiceUnavailable,
            AuthError::Idp { .. } => ErrorKind::BadGateway,
            AuthError::Context { source, .. } => source.kind(),
        }
    }

    /// Machine-readable code returned to clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Initialization(_) => "INITIALIZATION_FAILED",
            AuthError::MissingBearerToken => "MISSING_BEARER_TOKEN",
            AuthError::InvalidIdToken => "INVALID_ID_TOKEN",
            AuthError::TokenRevoked => "TOKEN_REVOKED",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Validation(_) => "VALIDATION_FAILED",
            AuthError::UnknownAttribute(_) => "UNKNOWN_ATTRIBUTE",
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UserDisabled => "USER_DISABLED",
            AuthError::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            AuthError::Transport(_) => "IDP_UNAVAILABLE",
            AuthError::Idp { .. } => "IDP_ERROR",
            AuthError::Internal(_) => "INTERNAL",
            AuthError::Context { source, .. } => source.code(),
        }
    }

    fn action(&self) -> Option<&'static str> {
        match self.root_cause() {
            AuthError::MissingBearerToken
            | AuthError::InvalidIdToken
            | AuthError::TokenRevoked
            | AuthError::InvalidRefreshToken => Some("Please sign in again"),
            AuthError::EmailTaken => Some("Sign in, or reset the password for this email"),
            AuthError::TooManyAttempts => Some("Wait a few minutes before retrying"),
            AuthError::Transport(_) | AuthError::Idp { .. } => Some("Please try again later"),
            _ => None,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures expose only the operation message; the cause
    /// stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Context { context, .. } if self.kind().is_server_error() => {
                context.to_string()
            }
            _ if self.kind().is_server_error() => self.kind().as_str().to_string(),
            _ => self.to_string(),
        };

        let err = AppError::new(self.kind(), message).with_code(self.code());
        match self.action() {
            Some(action) => err.with_action(action),
            None => err,
        }
    }

    /// Log errors that did not pass through `with_context`
    fn log(&self) {
        match self {
            AuthError::Context { .. } => {}
            AuthError::MissingBearerToken | AuthError::UnknownAttribute(_) => {
                tracing::debug!(error = %self, "Auth request rejected");
            }
            _ if self.kind().is_server_error() => {
                tracing::error!(error = %self, "Auth error");
            }
            _ => {
                tracing::warn!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::bearer::BearerError> for AuthError {
    fn from(_: platform::bearer::BearerError) -> Self {
        AuthError::MissingBearerToken
    }
}

/// Contextualized wrap-and-return for facade results
pub trait AuthResultExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> AuthResult<T>;
}

impl<T> AuthResultExt<T> for AuthResult<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> AuthResult<T> {
        self.map_err(|err| err.with_context(context))
    }
}
