//! Firebase Client
//!
//! API-key surface: password sign-in, token refresh and out-of-band mails.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entity::Session;
use crate::domain::identity_provider::IdentityClient;
use crate::domain::value_object::{Email, IdToken, LoginPassword, RefreshToken, UserId};
use crate::error::{AuthError, AuthResult};
use crate::infra::firebase::rest::{Endpoint, expect_success, read_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

/// Secure Token responses are snake_case
#[derive(Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

fn session(
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: &str,
) -> AuthResult<Session> {
    let unexpected = || AuthError::Idp {
        status: 200,
        code: "UNEXPECTED_RESPONSE".to_string(),
    };

    let expires_in = expires_in.parse::<u64>().map_err(|_| unexpected())?;

    Ok(Session {
        user_id: UserId::new(user_id).map_err(|_| unexpected())?,
        id_token: IdToken::new(id_token).map_err(|_| unexpected())?,
        refresh_token: RefreshToken::new(refresh_token).map_err(|_| unexpected())?,
        expires_in: Duration::from_secs(expires_in),
    })
}

/// End-user client authenticated with the project's API key
pub struct FirebaseClient {
    http: reqwest::Client,
    api_key: String,
    accounts_url: String,
    token_url: String,
}

impl FirebaseClient {
    pub(crate) fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        identity_toolkit_url: &str,
        secure_token_url: &str,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            accounts_url: format!("{}/v1/accounts", identity_toolkit_url.trim_end_matches('/')),
            token_url: format!("{}/v1/token", secure_token_url.trim_end_matches('/')),
        }
    }

    async fn post_accounts<B: Serialize>(&self, method: &str, body: &B) -> AuthResult<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}:{}", self.accounts_url, method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}

impl IdentityClient for FirebaseClient {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &LoginPassword,
    ) -> AuthResult<Session> {
        let request = SignInRequest {
            email: email.as_str(),
            password: password.expose(),
            return_secure_token: true,
        };

        let response = self.post_accounts("signInWithPassword", &request).await?;
        let signed_in: SignInResponse = read_json(Endpoint::SignIn, response).await?;

        session(
            signed_in.local_id,
            signed_in.id_token,
            signed_in.refresh_token,
            &signed_in.expires_in,
        )
    }

    async fn refresh_session(&self, refresh_token: &RefreshToken) -> AuthResult<Session> {
        let response = self
            .http
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?;

        let refreshed: RefreshResponse = read_json(Endpoint::RefreshToken, response).await?;

        session(
            refreshed.user_id,
            refreshed.id_token,
            refreshed.refresh_token,
            &refreshed.expires_in,
        )
    }

    async fn send_password_reset_email(&self, email: &Email) -> AuthResult<()> {
        let request = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email: email.as_str(),
        };

        let response = self.post_accounts("sendOobCode", &request).await?;
        expect_success(Endpoint::PasswordReset, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_response() {
        let body: SignInResponse = serde_json::from_value(serde_json::json!({
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "ada@example.com",
            "idToken": "id.token.sig",
            "registered": true,
            "refreshToken": "refresh-1",
            "expiresIn": "3600"
        }))
        .unwrap();

        let session = session(body.local_id, body.id_token, body.refresh_token, &body.expires_in)
            .unwrap();
        assert_eq!(session.user_id.as_str(), "uid-1");
        assert_eq!(session.expires_in, Duration::from_secs(3600));
    }

    #[test]
    fn test_refresh_response_is_snake_case() {
        let body: RefreshResponse = serde_json::from_value(serde_json::json!({
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "refresh-2",
            "id_token": "id.token.sig",
            "user_id": "uid-1",
            "project_id": "1234"
        }))
        .unwrap();
        assert_eq!(body.user_id, "uid-1");
    }

    #[test]
    fn test_session_rejects_bad_expiry() {
        let err = session("uid-1".into(), "id".into(), "refresh".into(), "soon").unwrap_err();
        assert!(matches!(err, AuthError::Idp { ref code, .. } if code == "UNEXPECTED_RESPONSE"));
    }

    #[test]
    fn test_urls() {
        let client = FirebaseClient::new(
            reqwest::Client::new(),
            "key",
            "https://identitytoolkit.googleapis.com/",
            "https://securetoken.googleapis.com",
        );
        assert_eq!(
            client.accounts_url,
            "https://identitytoolkit.googleapis.com/v1/accounts"
        );
        assert_eq!(client.token_url, "https://securetoken.googleapis.com/v1/token");
    }
}
