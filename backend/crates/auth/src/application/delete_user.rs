//! Delete User Use Case

use std::sync::Arc;

use crate::domain::identity_provider::IdentityAdmin;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Delete user use case
pub struct DeleteUserUseCase<A>
where
    A: IdentityAdmin,
{
    admin: Arc<A>,
}

impl<A> DeleteUserUseCase<A>
where
    A: IdentityAdmin,
{
    pub fn new(admin: Arc<A>) -> Self {
        Self { admin }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        self.admin.delete_user(user_id).await?;

        tracing::info!(user_id = %user_id, "User deleted");

        Ok(())
    }
}
