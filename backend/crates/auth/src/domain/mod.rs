//! Domain Layer
//!
//! Contains entities, value objects, and the identity provider ports.

pub mod entity;
pub mod identity_provider;
pub mod value_object;

// Re-exports
pub use entity::{AttributeField, AttributeUpdate, IdentityRecord, NewIdentity, Session, VerifiedToken};
pub use identity_provider::{IdentityAdmin, IdentityClient};
