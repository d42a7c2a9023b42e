//! In-Memory Identity Provider
//!
//! Process-local provider with the same observable contract as the
//! Firebase adapter. Used by tests and by `AUTH_BACKEND=memory`.
//!
//! Every refresh token remembers the user's revocation generation at
//! issue time; revocation bumps the generation and moves `valid_since`
//! forward, which invalidates every outstanding token of that user.
//! A password change revokes the same way.
//!
//! ID tokens stay verifiable until they expire, even after their user is
//! deleted, so resolving one reports the missing user. Expired ID tokens
//! are dropped whenever a new one is issued.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use platform::crypto::random_token;
use platform::password::HashedPassword;
use tokio::sync::Mutex;

use crate::domain::entity::{AttributeUpdate, IdentityRecord, NewIdentity, Session, VerifiedToken};
use crate::domain::identity_provider::{IdentityAdmin, IdentityClient};
use crate::domain::value_object::{Email, IdToken, LoginPassword, NewPassword, RefreshToken, UserId};
use crate::error::{AuthError, AuthResult};

pub const DEFAULT_ID_TOKEN_TTL: Duration = Duration::from_secs(3600);

const USER_ID_BYTES: usize = 21;
const TOKEN_BYTES: usize = 32;

fn hash_password(password: &NewPassword) -> AuthResult<HashedPassword> {
    password.hash().map_err(|e| AuthError::Internal(e.to_string()))
}

struct UserEntry {
    email: Email,
    password: HashedPassword,
    display_name: String,
    disabled: bool,
    generation: u64,
    valid_since: Option<DateTime<Utc>>,
}

impl UserEntry {
    fn revoke(&mut self) {
        self.generation += 1;
        self.valid_since = Some(Utc::now());
    }
}

struct IssuedIdToken {
    user_id: UserId,
    auth_time: DateTime<Utc>,
    expires_at: Instant,
}

struct IssuedRefreshToken {
    user_id: UserId,
    auth_time: DateTime<Utc>,
    generation: u64,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserEntry>,
    by_email: HashMap<String, UserId>,
    id_tokens: HashMap<String, IssuedIdToken>,
    refresh_tokens: HashMap<String, IssuedRefreshToken>,
    outbox: Vec<Email>,
}

impl State {
    fn record(&self, user_id: &UserId) -> Option<IdentityRecord> {
        self.users.get(user_id).map(|entry| IdentityRecord {
            user_id: user_id.clone(),
            email: Some(entry.email.clone()),
            display_name: Some(entry.display_name.clone()),
            disabled: entry.disabled,
            valid_since: entry.valid_since,
        })
    }

    fn user_mut(&mut self, user_id: &UserId) -> AuthResult<&mut UserEntry> {
        self.users.get_mut(user_id).ok_or(AuthError::UserNotFound)
    }

    fn prune_expired_id_tokens(&mut self) {
        let now = Instant::now();
        self.id_tokens.retain(|_, issued| now < issued.expires_at);
    }

    /// Revoke every session of `user_id` and forget its refresh tokens
    fn revoke_sessions(&mut self, user_id: &UserId) -> AuthResult<()> {
        self.user_mut(user_id)?.revoke();
        self.refresh_tokens
            .retain(|_, issued| &issued.user_id != user_id);
        Ok(())
    }

    fn issue_id_token(&mut self, user_id: &UserId, auth_time: DateTime<Utc>, ttl: Duration) -> AuthResult<IdToken> {
        self.prune_expired_id_tokens();

        let token = IdToken::new(random_token(TOKEN_BYTES))?;
        self.id_tokens.insert(
            token.as_str().to_string(),
            IssuedIdToken {
                user_id: user_id.clone(),
                auth_time,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(token)
    }
}

/// Process-local identity provider
pub struct InMemoryIdentityProvider {
    state: Mutex<State>,
    id_token_ttl: Duration,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            id_token_ttl: DEFAULT_ID_TOKEN_TTL,
        }
    }

    /// Override the ID token lifetime (zero makes every token expire at once)
    pub fn with_id_token_ttl(mut self, ttl: Duration) -> Self {
        self.id_token_ttl = ttl;
        self
    }

    /// Emails that were sent a password-reset mail, oldest first
    pub async fn sent_password_resets(&self) -> Vec<Email> {
        self.state.lock().await.outbox.clone()
    }

    pub async fn disable_user(&self, user_id: &UserId) -> AuthResult<()> {
        self.state.lock().await.user_mut(user_id)?.disabled = true;
        Ok(())
    }

    /// Outstanding (ID, refresh) token entries
    #[cfg(test)]
    async fn token_counts(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.id_tokens.len(), state.refresh_tokens.len())
    }
}

impl IdentityAdmin for InMemoryIdentityProvider {
    async fn create_user(&self, identity: &NewIdentity) -> AuthResult<UserId> {
        let password = hash_password(&identity.password)?;
        let mut state = self.state.lock().await;

        if state.by_email.contains_key(identity.email.as_str()) {
            return Err(AuthError::EmailTaken);
        }

        let user_id = UserId::new(random_token(USER_ID_BYTES))
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        state
            .by_email
            .insert(identity.email.as_str().to_string(), user_id.clone());
        state.users.insert(
            user_id.clone(),
            UserEntry {
                email: identity.email.clone(),
                password,
                display_name: identity.display_name.as_str().to_string(),
                disabled: false,
                generation: 0,
                valid_since: None,
            },
        );

        Ok(user_id)
    }

    async fn user_by_id(&self, user_id: &UserId) -> AuthResult<Option<IdentityRecord>> {
        Ok(self.state.lock().await.record(user_id))
    }

    async fn user_by_email(&self, email: &Email) -> AuthResult<Option<IdentityRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .by_email
            .get(email.as_str())
            .and_then(|user_id| state.record(user_id)))
    }

    async fn verify_id_token(&self, token: &IdToken) -> AuthResult<VerifiedToken> {
        let state = self.state.lock().await;

        let issued = state
            .id_tokens
            .get(token.as_str())
            .ok_or(AuthError::InvalidIdToken)?;

        if Instant::now() >= issued.expires_at {
            return Err(AuthError::InvalidIdToken);
        }

        Ok(VerifiedToken {
            user_id: issued.user_id.clone(),
            auth_time: issued.auth_time,
        })
    }

    async fn update_user(&self, user_id: &UserId, update: &AttributeUpdate) -> AuthResult<()> {
        // Hash before taking the lock
        let new_password = match update {
            AttributeUpdate::Password(password) => Some(hash_password(password)?),
            _ => None,
        };

        let mut state = self.state.lock().await;

        match update {
            AttributeUpdate::Email(email) => {
                if let Some(owner) = state.by_email.get(email.as_str()) {
                    if owner != user_id {
                        return Err(AuthError::EmailTaken);
                    }
                }
                let entry = state.user_mut(user_id)?;
                let previous = std::mem::replace(&mut entry.email, email.clone());
                state.by_email.remove(previous.as_str());
                state
                    .by_email
                    .insert(email.as_str().to_string(), user_id.clone());
            }
            AttributeUpdate::Password(_) => {
                let entry = state.user_mut(user_id)?;
                if let Some(hashed) = new_password {
                    entry.password = hashed;
                }
                state.revoke_sessions(user_id)?;
            }
            AttributeUpdate::DisplayName(name) => {
                state.user_mut(user_id)?.display_name = name.as_str().to_string();
            }
        }

        Ok(())
    }

    async fn revoke_refresh_tokens(&self, user_id: &UserId) -> AuthResult<()> {
        self.state.lock().await.revoke_sessions(user_id)
    }

    async fn delete_user(&self, user_id: &UserId) -> AuthResult<()> {
        let mut state = self.state.lock().await;

        let entry = state.users.remove(user_id).ok_or(AuthError::UserNotFound)?;
        state.by_email.remove(entry.email.as_str());
        state
            .refresh_tokens
            .retain(|_, issued| &issued.user_id != user_id);
        state.prune_expired_id_tokens();

        Ok(())
    }
}

impl IdentityClient for InMemoryIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &LoginPassword,
    ) -> AuthResult<Session> {
        let (user_id, hashed) = {
            let state = self.state.lock().await;
            let user_id = state
                .by_email
                .get(email.as_str())
                .cloned()
                .ok_or(AuthError::InvalidCredentials)?;
            let hashed = state
                .users
                .get(&user_id)
                .map(|entry| entry.password.clone())
                .ok_or(AuthError::InvalidCredentials)?;
            (user_id, hashed)
        };

        // Argon2 runs without holding the state lock
        if !password.matches(&hashed) {
            return Err(AuthError::InvalidCredentials);
        }

        let mut state = self.state.lock().await;

        // The account may have been deleted or its password changed meanwhile
        let entry = match state.users.get(&user_id) {
            Some(entry) if entry.password == hashed => entry,
            _ => return Err(AuthError::InvalidCredentials),
        };
        if entry.disabled {
            return Err(AuthError::UserDisabled);
        }

        let generation = entry.generation;
        let auth_time = Utc::now();

        let id_token = state.issue_id_token(&user_id, auth_time, self.id_token_ttl)?;
        let refresh_token = RefreshToken::new(random_token(TOKEN_BYTES))?;
        state.refresh_tokens.insert(
            refresh_token.as_str().to_string(),
            IssuedRefreshToken {
                user_id: user_id.clone(),
                auth_time,
                generation,
            },
        );

        Ok(Session {
            user_id,
            id_token,
            refresh_token,
            expires_in: self.id_token_ttl,
        })
    }

    async fn refresh_session(&self, refresh_token: &RefreshToken) -> AuthResult<Session> {
        let mut state = self.state.lock().await;

        let (user_id, auth_time, generation) = state
            .refresh_tokens
            .get(refresh_token.as_str())
            .map(|issued| (issued.user_id.clone(), issued.auth_time, issued.generation))
            .ok_or(AuthError::InvalidRefreshToken)?;

        let entry = state.user_mut(&user_id)?;
        if entry.disabled {
            return Err(AuthError::UserDisabled);
        }
        if entry.generation != generation {
            state.refresh_tokens.remove(refresh_token.as_str());
            return Err(AuthError::InvalidRefreshToken);
        }

        let id_token = state.issue_id_token(&user_id, auth_time, self.id_token_ttl)?;

        Ok(Session {
            user_id,
            id_token,
            refresh_token: refresh_token.clone(),
            expires_in: self.id_token_ttl,
        })
    }

    async fn send_password_reset_email(&self, email: &Email) -> AuthResult<()> {
        let mut state = self.state.lock().await;

        if !state.by_email.contains_key(email.as_str()) {
            return Err(AuthError::UserNotFound);
        }

        state.outbox.push(email.clone());
        tracing::debug!(email_domain = %email.domain(), "Password reset mail queued");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::DisplayName;

    fn new_identity(email: &str, password: &str) -> NewIdentity {
        NewIdentity {
            email: Email::new(email).unwrap(),
            password: NewPassword::new(password.to_string()).unwrap(),
            display_name: DisplayName::new("Ada Lovelace").unwrap(),
        }
    }

    fn login_password(raw: &str) -> LoginPassword {
        LoginPassword::new(raw.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();

        let record = idp.user_by_id(&user_id).await.unwrap().unwrap();
        assert_eq!(record.email.unwrap().as_str(), "ada@example.com");
        assert_eq!(record.display_name.as_deref(), Some("Ada Lovelace"));

        let email = Email::new("ada@example.com").unwrap();
        let record = idp.user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(record.user_id, user_id);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let idp = InMemoryIdentityProvider::new();
        idp.create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();

        let err = idp
            .create_user(&new_identity("ADA@example.com", "different"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let idp = InMemoryIdentityProvider::new();
        idp.create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();

        let session = idp
            .sign_in_with_password(&email, &login_password("analytical"))
            .await
            .unwrap();
        assert!(!session.id_token.as_str().is_empty());

        let err = idp
            .sign_in_with_password(&email, &login_password("engine"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_revocation_bumps_generation() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();
        let session = idp
            .sign_in_with_password(&email, &login_password("analytical"))
            .await
            .unwrap();

        assert!(idp.refresh_session(&session.refresh_token).await.is_ok());

        idp.revoke_refresh_tokens(&user_id).await.unwrap();

        let err = idp
            .refresh_session(&session.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));

        let verified = idp.verify_id_token(&session.id_token).await.unwrap();
        let record = idp.user_by_id(&user_id).await.unwrap().unwrap();
        assert!(record.has_revoked(verified.auth_time));
    }

    #[tokio::test]
    async fn test_zero_ttl_tokens_expire() {
        let idp = InMemoryIdentityProvider::new().with_id_token_ttl(Duration::ZERO);
        idp.create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();
        let session = idp
            .sign_in_with_password(&email, &login_password("analytical"))
            .await
            .unwrap();

        let err = idp.verify_id_token(&session.id_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidIdToken));
    }

    #[tokio::test]
    async fn test_update_email_reindexes() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let new_email = Email::new("countess@example.com").unwrap();

        idp.update_user(&user_id, &AttributeUpdate::Email(new_email.clone()))
            .await
            .unwrap();

        let old = Email::new("ada@example.com").unwrap();
        assert!(idp.user_by_email(&old).await.unwrap().is_none());
        assert!(idp.user_by_email(&new_email).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_password_reset_outbox() {
        let idp = InMemoryIdentityProvider::new();
        idp.create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();

        let email = Email::new("ada@example.com").unwrap();
        idp.send_password_reset_email(&email).await.unwrap();
        assert_eq!(idp.sent_password_resets().await, vec![email]);

        let unknown = Email::new("nobody@example.com").unwrap();
        let err = idp.send_password_reset_email(&unknown).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_expired_id_tokens_are_pruned_on_issue() {
        let idp = InMemoryIdentityProvider::new().with_id_token_ttl(Duration::ZERO);
        idp.create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();

        for _ in 0..5 {
            idp.sign_in_with_password(&email, &login_password("analytical"))
                .await
                .unwrap();
        }

        // Each issue drops the expired ones before it
        assert_eq!(idp.token_counts().await, (1, 5));
    }

    #[tokio::test]
    async fn test_delete_drops_tokens() {
        let idp = InMemoryIdentityProvider::new().with_id_token_ttl(Duration::ZERO);
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();
        for _ in 0..5 {
            idp.sign_in_with_password(&email, &login_password("analytical"))
                .await
                .unwrap();
        }

        idp.delete_user(&user_id).await.unwrap();

        assert_eq!(idp.token_counts().await, (0, 0));
    }

    #[tokio::test]
    async fn test_deleted_user_id_token_still_verifies_until_expiry() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();
        let session = idp
            .sign_in_with_password(&email, &login_password("analytical"))
            .await
            .unwrap();

        idp.delete_user(&user_id).await.unwrap();

        let verified = idp.verify_id_token(&session.id_token).await.unwrap();
        assert!(idp.user_by_id(&verified.user_id).await.unwrap().is_none());
        assert_eq!(idp.token_counts().await, (1, 0));
    }

    #[tokio::test]
    async fn test_revocation_forgets_refresh_tokens() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        idp.create_user(&new_identity("charles@example.com", "difference"))
            .await
            .unwrap();
        let ada = Email::new("ada@example.com").unwrap();
        let charles = Email::new("charles@example.com").unwrap();
        for _ in 0..3 {
            idp.sign_in_with_password(&ada, &login_password("analytical"))
                .await
                .unwrap();
        }
        let other = idp
            .sign_in_with_password(&charles, &login_password("difference"))
            .await
            .unwrap();

        idp.revoke_refresh_tokens(&user_id).await.unwrap();

        assert_eq!(idp.token_counts().await.1, 1);
        assert!(idp.refresh_session(&other.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_password_change_revokes_sessions() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        let email = Email::new("ada@example.com").unwrap();
        let session = idp
            .sign_in_with_password(&email, &login_password("analytical"))
            .await
            .unwrap();

        let password = NewPassword::new("difference-engine".to_string()).unwrap();
        idp.update_user(&user_id, &AttributeUpdate::Password(password))
            .await
            .unwrap();

        let err = idp
            .refresh_session(&session.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));

        let verified = idp.verify_id_token(&session.id_token).await.unwrap();
        let record = idp.user_by_id(&user_id).await.unwrap().unwrap();
        assert!(record.has_revoked(verified.auth_time));

        assert!(
            idp.sign_in_with_password(&email, &login_password("difference-engine"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_disabled_user_wrong_password_is_credential_error() {
        let idp = InMemoryIdentityProvider::new();
        let user_id = idp
            .create_user(&new_identity("ada@example.com", "analytical"))
            .await
            .unwrap();
        idp.disable_user(&user_id).await.unwrap();
        let email = Email::new("ada@example.com").unwrap();

        let err = idp
            .sign_in_with_password(&email, &login_password("engine"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = idp
            .sign_in_with_password(&email, &login_password("analytical"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserDisabled));
    }
}
