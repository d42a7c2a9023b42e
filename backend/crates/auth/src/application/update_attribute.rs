//! Update Attribute Use Case

use std::sync::Arc;

use crate::domain::entity::AttributeUpdate;
use crate::domain::identity_provider::IdentityAdmin;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Update attribute use case
pub struct UpdateAttributeUseCase<A>
where
    A: IdentityAdmin,
{
    admin: Arc<A>,
}

impl<A> UpdateAttributeUseCase<A>
where
    A: IdentityAdmin,
{
    pub fn new(admin: Arc<A>) -> Self {
        Self { admin }
    }

    /// Apply one update to an already-resolved identity
    pub async fn execute(&self, user_id: &UserId, update: &AttributeUpdate) -> AuthResult<()> {
        self.admin.update_user(user_id, update).await?;

        tracing::info!(
            user_id = %user_id,
            field = %update.field(),
            "User attribute updated"
        );

        Ok(())
    }
}
