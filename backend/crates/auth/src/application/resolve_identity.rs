//! Resolve Identity Use Case
//!
//! Maps an ID token to the identifier of a live, non-revoked user.

use std::sync::Arc;

use crate::domain::identity_provider::IdentityAdmin;
use crate::domain::value_object::{IdToken, UserId};
use crate::error::{AuthError, AuthResult};

/// Resolve identity use case
pub struct ResolveIdentityUseCase<A>
where
    A: IdentityAdmin,
{
    admin: Arc<A>,
}

impl<A> ResolveIdentityUseCase<A>
where
    A: IdentityAdmin,
{
    pub fn new(admin: Arc<A>) -> Self {
        Self { admin }
    }

    pub async fn execute(&self, id_token: &IdToken) -> AuthResult<UserId> {
        let verified = self.admin.verify_id_token(id_token).await?;

        let record = self
            .admin
            .user_by_id(&verified.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if record.disabled {
            return Err(AuthError::UserDisabled);
        }

        if record.has_revoked(verified.auth_time) {
            return Err(AuthError::TokenRevoked);
        }

        tracing::debug!(user_id = %verified.user_id, "ID token resolved");

        Ok(verified.user_id)
    }
}
