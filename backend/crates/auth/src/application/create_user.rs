//! Create User Use Case
//!
//! Registers a new identity with the provider.

use std::sync::Arc;

use crate::domain::entity::NewIdentity;
use crate::domain::identity_provider::IdentityAdmin;
use crate::domain::value_object::{DisplayName, Email, NewPassword, UserId};
use crate::error::AuthResult;

/// Create user input
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Create user use case
pub struct CreateUserUseCase<A>
where
    A: IdentityAdmin,
{
    admin: Arc<A>,
}

impl<A> CreateUserUseCase<A>
where
    A: IdentityAdmin,
{
    pub fn new(admin: Arc<A>) -> Self {
        Self { admin }
    }

    pub async fn execute(&self, input: CreateUserInput) -> AuthResult<UserId> {
        // Validate before anything reaches the provider
        let identity = NewIdentity {
            email: Email::new(input.email)?,
            password: NewPassword::new(input.password)?,
            display_name: DisplayName::from_parts(&input.first_name, &input.last_name)?,
        };

        let user_id = self.admin.create_user(&identity).await?;

        tracing::info!(
            user_id = %user_id,
            email_domain = %identity.email.domain(),
            "Successfully created new user"
        );

        Ok(user_id)
    }
}
