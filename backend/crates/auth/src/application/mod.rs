//! Application Layer
//!
//! Use cases and the facade composing them.

pub mod config;
pub mod create_user;
pub mod delete_user;
pub mod facade;
pub mod log_in;
pub mod log_out;
pub mod password_reset;
pub mod refresh_session;
pub mod resolve_identity;
pub mod update_attribute;

// Re-exports
pub use config::{ClientConfig, IdentityBackend, IdentityConfig, IdentityEndpoints};
pub use create_user::{CreateUserInput, CreateUserUseCase};
pub use delete_user::DeleteUserUseCase;
pub use facade::AuthFacade;
pub use log_in::{LogInInput, LogInUseCase};
pub use log_out::LogOutUseCase;
pub use password_reset::PasswordResetUseCase;
pub use refresh_session::RefreshSessionUseCase;
pub use resolve_identity::ResolveIdentityUseCase;
pub use update_attribute::UpdateAttributeUseCase;
