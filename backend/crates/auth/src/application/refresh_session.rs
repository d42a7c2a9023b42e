//! Refresh Session Use Case

use std::sync::Arc;

use crate::domain::entity::Session;
use crate::domain::identity_provider::IdentityClient;
use crate::domain::value_object::RefreshToken;
use crate::error::AuthResult;

/// Refresh session use case
pub struct RefreshSessionUseCase<C>
where
    C: IdentityClient,
{
    client: Arc<C>,
}

impl<C> RefreshSessionUseCase<C>
where
    C: IdentityClient,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, refresh_token: String) -> AuthResult<Session> {
        let refresh_token = RefreshToken::new(refresh_token)?;
        let session = self.client.refresh_session(&refresh_token).await?;

        tracing::debug!(user_id = %session.user_id, "Session refreshed");

        Ok(session)
    }
}
