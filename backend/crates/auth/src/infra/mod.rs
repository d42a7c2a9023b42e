//! Infrastructure Layer
//!
//! Identity provider adapters.

pub mod firebase;
pub mod memory;

pub use firebase::{FirebaseAdmin, FirebaseClient, FirebaseIdentity, initialize_firebase};
pub use memory::InMemoryIdentityProvider;
