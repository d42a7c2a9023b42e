//! Firebase Identity Provider
//!
//! REST adapter over Identity Toolkit, Secure Token and the service-account
//! OAuth2 flow.

pub mod admin;
pub mod client;
pub mod credentials;
pub(crate) mod id_token;
pub(crate) mod rest;

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::error::{AuthError, AuthResult};

pub use admin::FirebaseAdmin;
pub use client::FirebaseClient;
pub use credentials::ServiceAccountKey;

use credentials::AccessTokenProvider;
use id_token::IdTokenVerifier;

/// Initialized provider handles, shared for the life of the process
pub struct FirebaseIdentity {
    pub admin: Arc<FirebaseAdmin>,
    pub client: Arc<FirebaseClient>,
}

/// Load credentials, validate client configuration and reach the provider once
///
/// Any failure is an [`AuthError::Initialization`]; the caller is expected
/// to treat it as fatal.
pub async fn initialize_firebase(config: &IdentityConfig) -> AuthResult<FirebaseIdentity> {
    tracing::info!(
        credentials = %config.credentials_path.display(),
        "Initializing Firebase Admin instance..."
    );

    let key = ServiceAccountKey::from_file(&config.credentials_path).await?;
    config.client.validate()?;

    if key.project_id != config.client.project_id {
        tracing::warn!(
            service_account_project = %key.project_id,
            client_project = %config.client.project_id,
            "Service account belongs to a different project"
        );
    }

    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| AuthError::Initialization(format!("Cannot build HTTP client: {e}")))?;

    let tokens = AccessTokenProvider::new(http.clone(), &key)?;
    let verifier = IdTokenVerifier::new(
        http.clone(),
        config.endpoints.jwks_url.clone(),
        &config.client.project_id,
    );

    let admin = FirebaseAdmin::new(
        http.clone(),
        tokens,
        verifier,
        &config.endpoints.identity_toolkit_url,
        &config.client.project_id,
    );

    admin.warm_up().await.map_err(|e| {
        tracing::error!(error = %e, "Error initializing Firebase Admin instance");
        AuthError::Initialization(format!("Service account rejected or provider unreachable: {e}"))
    })?;

    tracing::info!(
        project_id = %config.client.project_id,
        client_email = %key.client_email,
        "Firebase Admin instance initialized"
    );

    let client = FirebaseClient::new(
        http,
        config.client.api_key.clone(),
        &config.endpoints.identity_toolkit_url,
        &config.endpoints.secure_token_url,
    );

    tracing::info!(
        auth_domain = config.client.auth_domain.is_some(),
        storage_bucket = config.client.storage_bucket.is_some(),
        messaging_sender_id = config.client.messaging_sender_id.is_some(),
        app_id = config.client.app_id.is_some(),
        measurement_id = config.client.measurement_id.is_some(),
        "Firebase client initialized"
    );

    Ok(FirebaseIdentity {
        admin: Arc::new(admin),
        client: Arc::new(client),
    })
}
