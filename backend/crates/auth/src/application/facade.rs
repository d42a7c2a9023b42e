//! Auth Facade
//!
//! Single entry point for every identity operation. Each operation
//! resolves tokens through the provider before acting, and wraps any
//! failure with a fixed message (see [`AuthResultExt::context`]).

use std::sync::Arc;

use crate::application::create_user::{CreateUserInput, CreateUserUseCase};
use crate::application::delete_user::DeleteUserUseCase;
use crate::application::log_in::{LogInInput, LogInUseCase};
use crate::application::log_out::LogOutUseCase;
use crate::application::password_reset::PasswordResetUseCase;
use crate::application::refresh_session::RefreshSessionUseCase;
use crate::application::resolve_identity::ResolveIdentityUseCase;
use crate::application::update_attribute::UpdateAttributeUseCase;
use crate::domain::entity::{AttributeUpdate, Session};
use crate::domain::identity_provider::{IdentityAdmin, IdentityClient};
use crate::domain::value_object::{DisplayName, Email, IdToken, NewPassword, UserId};
use crate::error::{AuthError, AuthResult, AuthResultExt};

/// Identity operations over a provider's admin and client surfaces
pub struct AuthFacade<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    admin: Arc<A>,
    client: Arc<C>,
}

impl<A, C> Clone for AuthFacade<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    fn clone(&self) -> Self {
        Self {
            admin: Arc::clone(&self.admin),
            client: Arc::clone(&self.client),
        }
    }
}

impl<A, C> AuthFacade<A, C>
where
    A: IdentityAdmin,
    C: IdentityClient,
{
    pub fn new(admin: Arc<A>, client: Arc<C>) -> Self {
        Self { admin, client }
    }

    pub async fn create_user(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> AuthResult<()> {
        let input = CreateUserInput {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
        };

        CreateUserUseCase::new(Arc::clone(&self.admin))
            .execute(input)
            .await
            .map(|_| ())
            .context("Error creating new user")
    }

    pub async fn resolve_identity(&self, id_token: &str) -> AuthResult<UserId> {
        let id_token = IdToken::new(id_token).context("Error getting user UID")?;

        ResolveIdentityUseCase::new(Arc::clone(&self.admin))
            .execute(&id_token)
            .await
            .context("Error getting user UID")
    }

    /// Resolve the token, then apply one update to that identity
    pub async fn update_attribute(&self, id_token: &str, update: AttributeUpdate) -> AuthResult<()> {
        let context = format!("Error updating {} for user", update.field());

        let user_id = self.resolve_identity(id_token).await.context(context.clone())?;

        UpdateAttributeUseCase::new(Arc::clone(&self.admin))
            .execute(&user_id, &update)
            .await
            .context(context)
    }

    /// Update by attribute name; names outside the closed set are rejected
    /// before the token is resolved
    pub async fn update_attribute_by_name(
        &self,
        id_token: &str,
        field: &str,
        value: String,
    ) -> AuthResult<()> {
        let update = AttributeUpdate::parse(field, value)
            .context(format!("Error updating {field} for user"))?;

        self.update_attribute(id_token, update).await
    }

    pub async fn update_email(&self, id_token: &str, email: String) -> AuthResult<()> {
        let email = Email::new(email)
            .map_err(AuthError::from)
            .context("Error updating email for user")?;
        self.update_attribute(id_token, AttributeUpdate::Email(email))
            .await
    }

    pub async fn update_password(&self, id_token: &str, password: String) -> AuthResult<()> {
        let password = NewPassword::new(password)
            .map_err(AuthError::from)
            .context("Error updating password for user")?;
        self.update_attribute(id_token, AttributeUpdate::Password(password))
            .await
    }

    pub async fn update_display_name(&self, id_token: &str, display_name: String) -> AuthResult<()> {
        let display_name = DisplayName::new(display_name)
            .map_err(AuthError::from)
            .context("Error updating displayName for user")?;
        self.update_attribute(id_token, AttributeUpdate::DisplayName(display_name))
            .await
    }

    pub async fn send_password_reset(&self, email: impl Into<String>) -> AuthResult<()> {
        PasswordResetUseCase::new(Arc::clone(&self.admin), Arc::clone(&self.client))
            .execute(email.into())
            .await
            .context("Error resetting password")
    }

    pub async fn log_in(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> AuthResult<Session> {
        let input = LogInInput {
            email: email.into(),
            password: password.into(),
        };

        LogInUseCase::new(Arc::clone(&self.admin), Arc::clone(&self.client))
            .execute(input)
            .await
            .context("Login failed: Incorrect password or email")
    }

    pub async fn refresh_session(&self, refresh_token: impl Into<String>) -> AuthResult<Session> {
        RefreshSessionUseCase::new(Arc::clone(&self.client))
            .execute(refresh_token.into())
            .await
            .context("Failed to refresh session")
    }

    /// Revoke every refresh token of the caller's identity
    pub async fn log_out(&self, id_token: &str) -> AuthResult<bool> {
        let user_id = self
            .resolve_identity(id_token)
            .await
            .context("Failed to log out user")?;

        LogOutUseCase::new(Arc::clone(&self.admin))
            .execute(&user_id)
            .await
            .context("Failed to log out user")
    }

    pub async fn delete_user(&self, id_token: &str) -> AuthResult<()> {
        let user_id = self
            .resolve_identity(id_token)
            .await
            .context("Failed to delete user")?;

        DeleteUserUseCase::new(Arc::clone(&self.admin))
            .execute(&user_id)
            .await
            .context("Failed to delete user")
    }
}
