//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use platform::bearer::extract_bearer_token;

use crate::application::AuthFacade;
use crate::domain::identity_provider::{IdentityAdmin, IdentityClient};
use crate::error::AuthResult;
use crate::presentation::dto::{
    CreateUserRequest, IdentityResponse, LogInRequest, LogOutResponse, PasswordResetRequest,
    RefreshSessionRequest, SessionResponse, UpdateAttributeRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<A, C>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    pub facade: AuthFacade<A, C>,
}

impl<A, C> Clone for AuthAppState<A, C>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            facade: self.facade.clone(),
        }
    }
}

fn bearer(headers: &HeaderMap) -> AuthResult<String> {
    Ok(extract_bearer_token(headers)?)
}

// ============================================================================
// Users
// ============================================================================

/// POST /api/auth/users
pub async fn create_user<A, C>(
    State(state): State<AuthAppState<A, C>>,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<StatusCode>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    state
        .facade
        .create_user(req.first_name, req.last_name, req.email, req.password)
        .await?;

    Ok(StatusCode::CREATED)
}

/// GET /api/auth/me
pub async fn me<A, C>(
    State(state): State<AuthAppState<A, C>>,
    headers: HeaderMap,
) -> AuthResult<Json<IdentityResponse>>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let id_token = bearer(&headers)?;
    let user_id = state.facade.resolve_identity(&id_token).await?;

    Ok(Json(IdentityResponse {
        uid: user_id.into_string(),
    }))
}

/// PATCH /api/auth/me/{field}
pub async fn update_attribute<A, C>(
    State(state): State<AuthAppState<A, C>>,
    headers: HeaderMap,
    Path(field): Path<String>,
    Json(req): Json<UpdateAttributeRequest>,
) -> AuthResult<StatusCode>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let id_token = bearer(&headers)?;
    state
        .facade
        .update_attribute_by_name(&id_token, &field, req.value)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/auth/me
pub async fn delete_user<A, C>(
    State(state): State<AuthAppState<A, C>>,
    headers: HeaderMap,
) -> AuthResult<StatusCode>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let id_token = bearer(&headers)?;
    state.facade.delete_user(&id_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/password-reset
pub async fn password_reset<A, C>(
    State(state): State<AuthAppState<A, C>>,
    Json(req): Json<PasswordResetRequest>,
) -> AuthResult<StatusCode>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    state.facade.send_password_reset(req.email).await?;

    Ok(StatusCode::ACCEPTED)
}

// ============================================================================
// Sessions
// ============================================================================

/// POST /api/auth/login
pub async fn log_in<A, C>(
    State(state): State<AuthAppState<A, C>>,
    Json(req): Json<LogInRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let session = state.facade.log_in(req.email, req.password).await?;

    Ok(Json(session.into()))
}

/// POST /api/auth/token
pub async fn refresh_session<A, C>(
    State(state): State<AuthAppState<A, C>>,
    Json(req): Json<RefreshSessionRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let session = state.facade.refresh_session(req.refresh_token).await?;

    Ok(Json(session.into()))
}

/// POST /api/auth/logout
pub async fn log_out<A, C>(
    State(state): State<AuthAppState<A, C>>,
    headers: HeaderMap,
) -> AuthResult<Json<LogOutResponse>>
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let id_token = bearer(&headers)?;
    let success = state.facade.log_out(&id_token).await?;

    Ok(Json(LogOutResponse { success }))
}
