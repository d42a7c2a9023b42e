//! Log Out Use Case
//!
//! Revokes every refresh token of the identity, not only the caller's.

use std::sync::Arc;

use crate::domain::identity_provider::IdentityAdmin;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Log out use case
pub struct LogOutUseCase<A>
where
    A: IdentityAdmin,
{
    admin: Arc<A>,
}

impl<A> LogOutUseCase<A>
where
    A: IdentityAdmin,
{
    pub fn new(admin: Arc<A>) -> Self {
        Self { admin }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<bool> {
        self.admin.revoke_refresh_tokens(user_id).await?;

        tracing::info!(user_id = %user_id, "User logged out, refresh tokens revoked");

        Ok(true)
    }
}
