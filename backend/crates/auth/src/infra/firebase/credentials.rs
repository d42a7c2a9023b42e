//! Service Account Credentials
//!
//! OAuth2 access tokens for the admin API, minted with the JWT-bearer
//! grant from a service-account key and cached until shortly before they
//! expire.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{AuthError, AuthResult};

const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
                      https://www.googleapis.com/auth/identitytoolkit \
                      https://www.googleapis.com/auth/userinfo.email";

/// Service-account key file contents
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub async fn from_file(path: &Path) -> AuthResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AuthError::Initialization(format!(
                "Cannot read service account key {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> AuthResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AuthError::Initialization(format!("Malformed service account key: {e}")))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct OAuthError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Cached OAuth2 access token source
pub(crate) struct AccessTokenProvider {
    http: reqwest::Client,
    client_email: String,
    token_uri: String,
    header: Header,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl AccessTokenProvider {
    pub(crate) fn new(http: reqwest::Client, key: &ServiceAccountKey) -> AuthResult<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AuthError::Initialization(format!("Invalid service account private key: {e}"))
        })?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        Ok(Self {
            http,
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            header,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    /// Current access token, minting a new one when close to expiry
    pub(crate) async fn access_token(&self) -> AuthResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(token.token.clone());
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);

        Ok(token)
    }

    fn assertion(&self) -> AuthResult<String> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&self.header, &claims, &self.signing_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token assertion: {e}")))
    }

    async fn fetch(&self) -> AuthResult<CachedToken> {
        let assertion = self.assertion()?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let code = serde_json::from_slice::<OAuthError>(&body)
                .map(|e| {
                    tracing::warn!(
                        error = %e.error,
                        description = e.error_description.as_deref().unwrap_or(""),
                        "Access token request rejected"
                    );
                    e.error
                })
                .unwrap_or_else(|_| format!("HTTP_{}", status.as_u16()));

            return Err(AuthError::Idp {
                status: status.as_u16(),
                code,
            });
        }

        let token: TokenResponse = serde_json::from_slice(&body).map_err(|_| AuthError::Idp {
            status: status.as_u16(),
            code: "UNEXPECTED_RESPONSE".to_string(),
        })?;

        let lifetime = Duration::from_secs(token.expires_in);
        tracing::debug!(expires_in = token.expires_in, "Minted admin access token");

        Ok(CachedToken {
            token: token.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN),
        })
    }
}
