//! Auth Router

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::application::AuthFacade;
use crate::domain::identity_provider::{IdentityAdmin, IdentityClient};
use crate::infra::firebase::{FirebaseAdmin, FirebaseClient, FirebaseIdentity};
use crate::infra::memory::InMemoryIdentityProvider;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router backed by Firebase
pub fn auth_router(identity: FirebaseIdentity) -> Router {
    auth_router_generic::<FirebaseAdmin, FirebaseClient>(identity.admin, identity.client)
}

/// Create the Auth router backed by a process-local provider
pub fn auth_router_in_memory(provider: Arc<InMemoryIdentityProvider>) -> Router {
    auth_router_generic(Arc::clone(&provider), provider)
}

/// Create a generic Auth router for any provider implementation
pub fn auth_router_generic<A, C>(admin: Arc<A>, client: Arc<C>) -> Router
where
    A: IdentityAdmin + Sync + 'static,
    C: IdentityClient + Sync + 'static,
{
    let state = AuthAppState {
        facade: AuthFacade::new(admin, client),
    };

    Router::new()
        .route("/users", post(handlers::create_user::<A, C>))
        .route("/login", post(handlers::log_in::<A, C>))
        .route("/token", post(handlers::refresh_session::<A, C>))
        .route("/logout", post(handlers::log_out::<A, C>))
        .route(
            "/me",
            get(handlers::me::<A, C>).delete(handlers::delete_user::<A, C>),
        )
        .route("/me/{field}", patch(handlers::update_attribute::<A, C>))
        .route("/password-reset", post(handlers::password_reset::<A, C>))
        .with_state(state)
}
