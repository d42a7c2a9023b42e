//! Value Objects
//!
//! Inputs are validated here, before anything is sent to the identity
//! provider.

pub mod display_name;
pub mod email;
pub mod password;
pub mod token;
pub mod user_id;

use kernel::id::IdError;
use platform::password::PasswordPolicyError;
use thiserror::Error;

/// Validation failure of a single input value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    Email(&'static str),

    #[error(transparent)]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid display name: {0}")]
    DisplayName(&'static str),

    #[error("Invalid user identifier: {0}")]
    UserId(#[from] IdError),

    /// Provider-side rejection (e.g. `WEAK_PASSWORD : ...`)
    #[error("Rejected by identity provider: {0}")]
    Provider(String),
}

pub use display_name::DisplayName;
pub use email::Email;
pub use password::{LoginPassword, NewPassword};
pub use token::{IdToken, RefreshToken};
pub use user_id::UserId;
