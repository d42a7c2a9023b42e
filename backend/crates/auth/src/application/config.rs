//! Application Configuration
//!
//! Identity provider configuration, read from the environment.

use std::fmt;
use std::path::PathBuf;

use crate::error::{AuthError, AuthResult};

/// Service-account key file used when `GOOGLE_APPLICATION_CREDENTIALS` is unset
pub const DEFAULT_CREDENTIALS_PATH: &str = "enviroment/credentials.json";

pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Client configuration of the provider project
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub auth_domain: Option<String>,
    pub project_id: String,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            auth_domain: None,
            project_id: project_id.into(),
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
            measurement_id: None,
        }
    }

    /// Reject blank required values
    pub fn validate(&self) -> AuthResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AuthError::Initialization("API_KEY is empty".to_string()));
        }
        if self.project_id.trim().is_empty() {
            return Err(AuthError::Initialization("PROJECT_ID is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .field("measurement_id", &self.measurement_id)
            .finish()
    }
}

/// Base URLs of the provider's REST surfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEndpoints {
    pub identity_toolkit_url: String,
    pub secure_token_url: String,
    pub jwks_url: String,
}

impl Default for IdentityEndpoints {
    fn default() -> Self {
        Self {
            identity_toolkit_url: DEFAULT_IDENTITY_TOOLKIT_URL.to_string(),
            secure_token_url: DEFAULT_SECURE_TOKEN_URL.to_string(),
            jwks_url: DEFAULT_JWKS_URL.to_string(),
        }
    }
}

/// Which identity provider backs the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityBackend {
    #[default]
    Firebase,
    /// Process-local provider for development and tests
    Memory,
}

impl IdentityBackend {
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AuthResult<Self> {
        match lookup("AUTH_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("firebase") => Ok(IdentityBackend::Firebase),
            Some("memory") => Ok(IdentityBackend::Memory),
            Some(other) => Err(AuthError::Initialization(format!(
                "Unknown AUTH_BACKEND: {other}"
            ))),
        }
    }
}

/// Full provider configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub client: ClientConfig,
    /// Service-account key (JSON)
    pub credentials_path: PathBuf,
    pub endpoints: IdentityEndpoints,
}

impl IdentityConfig {
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AuthResult<Self> {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| {
                AuthError::Initialization(format!("Missing environment variable {key}"))
            })
        };

        let client = ClientConfig {
            api_key: required("API_KEY")?,
            auth_domain: optional("AUTH_DOMAIN"),
            project_id: required("PROJECT_ID")?,
            storage_bucket: optional("STORAGE_BUCKET"),
            messaging_sender_id: optional("MESSAGING_SENDER_ID"),
            app_id: optional("APP_ID"),
            measurement_id: optional("MEASUREMENT_ID"),
        };

        let defaults = IdentityEndpoints::default();
        let endpoints = IdentityEndpoints {
            identity_toolkit_url: optional("IDENTITY_TOOLKIT_URL")
                .unwrap_or(defaults.identity_toolkit_url),
            secure_token_url: optional("SECURE_TOKEN_URL").unwrap_or(defaults.secure_token_url),
            jwks_url: optional("JWKS_URL").unwrap_or(defaults.jwks_url),
        };

        let credentials_path = optional("GOOGLE_APPLICATION_CREDENTIALS")
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string())
            .into();

        Ok(Self {
            client,
            credentials_path,
            endpoints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_minimal() {
        let config =
            IdentityConfig::from_lookup(lookup(&[("API_KEY", "key"), ("PROJECT_ID", "booking")]))
                .unwrap();

        assert_eq!(config.client.api_key, "key");
        assert_eq!(config.client.project_id, "booking");
        assert_eq!(config.client.auth_domain, None);
        assert_eq!(config.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        assert_eq!(config.endpoints, IdentityEndpoints::default());
    }

    #[test]
    fn test_from_lookup_optional_values() {
        let config = IdentityConfig::from_lookup(lookup(&[
            ("API_KEY", "key"),
            ("PROJECT_ID", "booking"),
            ("AUTH_DOMAIN", "booking.firebaseapp.com"),
            ("MEASUREMENT_ID", ""),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/etc/sa.json"),
            ("IDENTITY_TOOLKIT_URL", "http://localhost:9099/identitytoolkit.googleapis.com"),
        ]))
        .unwrap();

        assert_eq!(
            config.client.auth_domain.as_deref(),
            Some("booking.firebaseapp.com")
        );
        assert_eq!(config.client.measurement_id, None);
        assert_eq!(config.credentials_path, PathBuf::from("/etc/sa.json"));
        assert_eq!(
            config.endpoints.identity_toolkit_url,
            "http://localhost:9099/identitytoolkit.googleapis.com"
        );
        assert_eq!(config.endpoints.secure_token_url, DEFAULT_SECURE_TOKEN_URL);
    }

    #[test]
    fn test_missing_required_variable() {
        let err = IdentityConfig::from_lookup(lookup(&[("PROJECT_ID", "booking")])).unwrap_err();
        assert!(matches!(err, AuthError::Initialization(ref m) if m.contains("API_KEY")));

        let err = IdentityConfig::from_lookup(lookup(&[("API_KEY", "key"), ("PROJECT_ID", " ")]))
            .unwrap_err();
        assert!(matches!(err, AuthError::Initialization(ref m) if m.contains("PROJECT_ID")));
    }

    #[test]
    fn test_backend_selection() {
        assert_eq!(
            IdentityBackend::from_lookup(lookup(&[])).unwrap(),
            IdentityBackend::Firebase
        );
        assert_eq!(
            IdentityBackend::from_lookup(lookup(&[("AUTH_BACKEND", "memory")])).unwrap(),
            IdentityBackend::Memory
        );
        assert!(IdentityBackend::from_lookup(lookup(&[("AUTH_BACKEND", "ldap")])).is_err());
    }

    #[test]
    fn test_client_config_debug_hides_api_key() {
        let config = ClientConfig::new("AIzaSecretKey", "booking");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("AIzaSecretKey"));
        assert!(debug.contains("booking"));
    }
}
