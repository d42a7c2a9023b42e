//! Password Reset Use Case
//!
//! Sends the provider's password-reset mail to a registered email.

use std::sync::Arc;

use crate::domain::identity_provider::{IdentityAdmin, IdentityClient};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Password reset use case
pub struct PasswordResetUseCase<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    admin: Arc<A>,
    client: Arc<C>,
}

impl<A, C> PasswordResetUseCase<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    pub fn new(admin: Arc<A>, client: Arc<C>) -> Self {
        Self { admin, client }
    }

    pub async fn execute(&self, email: String) -> AuthResult<()> {
        let email = Email::new(email)?;

        // The client surface may mask unknown emails; the admin lookup does not
        if self.admin.user_by_email(&email).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        self.client.send_password_reset_email(&email).await?;

        tracing::info!(email_domain = %email.domain(), "Password reset email sent");

        Ok(())
    }
}
