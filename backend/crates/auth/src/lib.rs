//! Auth (Authentication) Backend Module
//!
//! Authentication is delegated to an external identity provider; this
//! crate validates inputs, resolves ID tokens and forwards operations.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, identity provider ports
//! - `application/` - Use cases, the `AuthFacade`, configuration
//! - `infra/` - Firebase REST adapter and an in-memory provider
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Operations
//! - Create user, resolve identity, update email / password / display name
//! - Log in, refresh session, log out (revokes every refresh token)
//! - Delete user, send password-reset email
//!
//! ## Security Model
//! - Every mutating operation resolves the caller's ID token first
//! - ID tokens are verified locally against the provider's signing keys,
//!   then checked against the user's revocation watermark
//! - Passwords and tokens are redacted from `Debug` output and logs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::AuthFacade;
pub use application::config::{IdentityBackend, IdentityConfig};
pub use error::{AuthError, AuthResult};
pub use infra::firebase::initialize_firebase;
pub use infra::memory::InMemoryIdentityProvider;
pub use presentation::router::{auth_router, auth_router_in_memory};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
