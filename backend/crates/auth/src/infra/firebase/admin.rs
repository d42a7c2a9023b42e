//! Firebase Admin
//!
//! Service-account surface of the Identity Toolkit v1 project API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{AttributeUpdate, IdentityRecord, NewIdentity, VerifiedToken};
use crate::domain::identity_provider::IdentityAdmin;
use crate::domain::value_object::{Email, IdToken, UserId};
use crate::error::{AuthError, AuthResult};
use crate::infra::firebase::credentials::AccessTokenProvider;
use crate::infra::firebase::id_token::IdTokenVerifier;
use crate::infra::firebase::rest::{Endpoint, expect_success, read_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountResponse {
    local_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    local_id: Option<[&'a str; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<[&'a str; 1]>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    disabled: bool,
    /// Epoch seconds, sent as a string
    valid_since: Option<String>,
}

impl UserInfo {
    fn into_record(self) -> AuthResult<IdentityRecord> {
        let user_id = UserId::new(self.local_id).map_err(|_| unexpected_response())?;

        let valid_since = match self.valid_since {
            Some(secs) => {
                let secs = secs.parse::<i64>().map_err(|_| unexpected_response())?;
                Some(DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(unexpected_response)?)
            }
            None => None,
        };

        Ok(IdentityRecord {
            user_id,
            email: self.email.map(Email::from_provider),
            display_name: self.display_name,
            disabled: self.disabled,
            valid_since,
        })
    }
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccountRequest<'a> {
    local_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_since: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccountRequest<'a> {
    local_id: &'a str,
}

fn unexpected_response() -> AuthError {
    AuthError::Idp {
        status: 200,
        code: "UNEXPECTED_RESPONSE".to_string(),
    }
}

/// Admin client authenticated with a service account
pub struct FirebaseAdmin {
    http: reqwest::Client,
    tokens: AccessTokenProvider,
    verifier: IdTokenVerifier,
    project_url: String,
}

impl FirebaseAdmin {
    pub(crate) fn new(
        http: reqwest::Client,
        tokens: AccessTokenProvider,
        verifier: IdTokenVerifier,
        identity_toolkit_url: &str,
        project_id: &str,
    ) -> Self {
        Self {
            http,
            tokens,
            verifier,
            project_url: format!(
                "{}/v1/projects/{}",
                identity_toolkit_url.trim_end_matches('/'),
                project_id
            ),
        }
    }

    /// Mint an access token now so bad credentials surface at startup
    pub(crate) async fn warm_up(&self) -> AuthResult<()> {
        self.tokens.access_token().await.map(|_| ())
    }

    async fn post<B: Serialize>(&self, method: &str, body: &B) -> AuthResult<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(format!("{}/{}", self.project_url, method))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    async fn lookup(&self, request: LookupRequest<'_>) -> AuthResult<Option<IdentityRecord>> {
        let response = self.post("accounts:lookup", &request).await?;
        let found: LookupResponse = read_json(Endpoint::Admin, response).await?;

        found
            .users
            .into_iter()
            .next()
            .map(UserInfo::into_record)
            .transpose()
    }

    async fn update(&self, request: UpdateAccountRequest<'_>) -> AuthResult<()> {
        let response = self.post("accounts:update", &request).await?;
        expect_success(Endpoint::Admin, response).await
    }
}

impl IdentityAdmin for FirebaseAdmin {
    async fn create_user(&self, identity: &NewIdentity) -> AuthResult<UserId> {
        let request = CreateAccountRequest {
            email: identity.email.as_str(),
            password: identity.password.expose(),
            display_name: identity.display_name.as_str(),
        };

        let response = self.post("accounts", &request).await?;
        let created: CreateAccountResponse = read_json(Endpoint::Admin, response).await?;

        UserId::new(created.local_id).map_err(|_| unexpected_response())
    }

    async fn user_by_id(&self, user_id: &UserId) -> AuthResult<Option<IdentityRecord>> {
        self.lookup(LookupRequest {
            local_id: Some([user_id.as_str()]),
            email: None,
        })
        .await
    }

    async fn user_by_email(&self, email: &Email) -> AuthResult<Option<IdentityRecord>> {
        self.lookup(LookupRequest {
            local_id: None,
            email: Some([email.as_str()]),
        })
        .await
    }

    async fn verify_id_token(&self, token: &IdToken) -> AuthResult<VerifiedToken> {
        self.verifier.verify(token).await
    }

    async fn update_user(&self, user_id: &UserId, update: &AttributeUpdate) -> AuthResult<()> {
        let mut request = UpdateAccountRequest {
            local_id: user_id.as_str(),
            ..Default::default()
        };

        match update {
            AttributeUpdate::Email(email) => request.email = Some(email.as_str()),
            AttributeUpdate::Password(password) => request.password = Some(password.expose()),
            AttributeUpdate::DisplayName(name) => request.display_name = Some(name.as_str()),
        }

        self.update(request).await
    }

    async fn revoke_refresh_tokens(&self, user_id: &UserId) -> AuthResult<()> {
        self.update(UpdateAccountRequest {
            local_id: user_id.as_str(),
            valid_since: Some(Utc::now().timestamp().to_string()),
            ..Default::default()
        })
        .await
    }

    async fn delete_user(&self, user_id: &UserId) -> AuthResult<()> {
        let response = self
            .post(
                "accounts:delete",
                &DeleteAccountRequest {
                    local_id: user_id.as_str(),
                },
            )
            .await?;
        expect_success(Endpoint::Admin, response).await
    }
}
