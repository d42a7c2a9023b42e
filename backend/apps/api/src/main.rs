//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::{IdentityBackend, IdentityConfig, InMemoryIdentityProvider};
use axum::{
    Router, http,
    http::{Method, header},
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_PORT: u16 = 3001;

/// Router for the configured identity provider; provider failures are fatal
async fn identity_router(backend: IdentityBackend) -> anyhow::Result<Router> {
    let router = match backend {
        IdentityBackend::Firebase => {
            let config = IdentityConfig::from_env()?;
            let identity = auth::initialize_firebase(&config).await?;
            auth::auth_router(identity)
        }
        IdentityBackend::Memory => {
            tracing::warn!("Using the in-memory identity provider; accounts are not persisted");
            auth::auth_router_in_memory(Arc::new(InMemoryIdentityProvider::new()))
        }
    };

    Ok(router)
}

fn cors_layer() -> CorsLayer {
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

fn listen_port() -> anyhow::Result<u16> {
    match env::var("PORT") {
        Ok(port) => Ok(port.trim().parse()?),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Identity provider
    let backend = IdentityBackend::from_env()?;
    let auth_router = match identity_router(backend).await {
        Ok(router) => router,
        Err(e) => {
            tracing::error!(error = %e, ?backend, "Identity provider initialization failed");
            return Err(e);
        }
    };

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port()?));
    tracing::info!("Server is running and listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
