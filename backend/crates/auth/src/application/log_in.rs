//! Log In Use Case
//!
//! Exchanges email and password for a session.

use std::sync::Arc;

use crate::domain::entity::Session;
use crate::domain::identity_provider::{IdentityAdmin, IdentityClient};
use crate::domain::value_object::{Email, LoginPassword};
use crate::error::{AuthError, AuthResult};

/// Log in input
pub struct LogInInput {
    pub email: String,
    pub password: String,
}

/// Log in use case
pub struct LogInUseCase<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    admin: Arc<A>,
    client: Arc<C>,
}

impl<A, C> LogInUseCase<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    pub fn new(admin: Arc<A>, client: Arc<C>) -> Self {
        Self { admin, client }
    }

    pub async fn execute(&self, input: LogInInput) -> AuthResult<Session> {
        let email = Email::new(input.email)?;
        let password = LoginPassword::new(input.password)?;

        // Absent account and wrong password are indistinguishable to the caller
        let Some(record) = self.admin.user_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        // The password is checked before the account state is revealed
        let session = self.client.sign_in_with_password(&email, &password).await?;

        if record.disabled {
            return Err(AuthError::UserDisabled);
        }

        tracing::info!(user_id = %session.user_id, "User logged in");

        Ok(session)
    }
}
