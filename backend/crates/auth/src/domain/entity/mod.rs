//! Domain Entities

pub mod attribute;
pub mod identity;
pub mod session;

pub use attribute::{AttributeField, AttributeUpdate};
pub use identity::{IdentityRecord, NewIdentity};
pub use session::{Session, VerifiedToken};
