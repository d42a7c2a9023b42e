//! Identity Provider Ports
//!
//! The provider owns user records, credential checks and the token
//! lifecycle. Implementations live in the infrastructure layer.

use crate::domain::entity::{AttributeUpdate, IdentityRecord, NewIdentity, Session, VerifiedToken};
use crate::domain::value_object::{Email, IdToken, LoginPassword, RefreshToken, UserId};
use crate::error::AuthResult;

/// Privileged (service-account) surface of the provider
#[trait_variant::make(IdentityAdmin: Send)]
pub trait LocalIdentityAdmin {
    /// Create a user record, returning the provider-assigned identifier
    async fn create_user(&self, identity: &NewIdentity) -> AuthResult<UserId>;

    /// Find user by identifier
    async fn user_by_id(&self, user_id: &UserId) -> AuthResult<Option<IdentityRecord>>;

    /// Find user by email
    async fn user_by_email(&self, email: &Email) -> AuthResult<Option<IdentityRecord>>;

    /// Check signature, audience, issuer and lifetime of an ID token
    ///
    /// Revocation is not checked here; see [`IdentityRecord::has_revoked`].
    async fn verify_id_token(&self, token: &IdToken) -> AuthResult<VerifiedToken>;

    /// Apply a single-field update
    async fn update_user(&self, user_id: &UserId, update: &AttributeUpdate) -> AuthResult<()>;

    /// Revoke every refresh token of the user
    async fn revoke_refresh_tokens(&self, user_id: &UserId) -> AuthResult<()>;

    /// Delete the user record
    async fn delete_user(&self, user_id: &UserId) -> AuthResult<()>;
}

/// End-user (API key) surface of the provider
#[trait_variant::make(IdentityClient: Send)]
pub trait LocalIdentityClient {
    /// Exchange email and password for a token pair
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &LoginPassword,
    ) -> AuthResult<Session>;

    /// Exchange a refresh token for a fresh token pair
    async fn refresh_session(&self, refresh_token: &RefreshToken) -> AuthResult<Session>;

    /// Ask the provider to mail a password-reset link
    async fn send_password_reset_email(&self, email: &Email) -> AuthResult<()>;
}
