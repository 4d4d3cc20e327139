// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the vault endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header, request};
use axum::routing::{MethodRouter, get};
use cryptum_auth::{RequestAuthenticator, TimestampWindow};
use cryptum_config::CryptumConfig;
use cryptum_config::model::ServerConfig;
use cryptum_core::{CryptumError, StorageAdapter};
use cryptum_vault::{CredentialAdmission, ProfileStore};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub authenticator: RequestAuthenticator,
    pub profiles: ProfileStore,
    pub credentials: CredentialAdmission,
    /// Backing storage, used directly only for health checks.
    pub storage: Arc<dyn StorageAdapter>,
    pub health: HealthState,
}

impl GatewayState {
    /// Wire the vault services to an initialized storage backend.
    pub fn new(storage: Arc<dyn StorageAdapter>, config: &CryptumConfig) -> Self {
        Self {
            authenticator: RequestAuthenticator::new(TimestampWindow::new(
                config.auth.timestamp_tolerance_secs,
            )),
            profiles: ProfileStore::new(storage.clone()),
            credentials: CredentialAdmission::new(
                storage.clone(),
                config.credentials.max_per_profile,
            ),
            storage,
            health: HealthState {
                start_time: Instant::now(),
            },
        }
    }
}

/// Request headers browsers may send cross-origin.
const ALLOWED_HEADERS: [&str; 5] = [
    "public-key",
    "timestamp",
    "signature",
    "hashed-pin",
    "protector",
];

/// Whether `origin` is `http://localhost` with an optional numeric port.
fn is_localhost_origin(origin: &str) -> bool {
    match origin.strip_prefix("http://localhost") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

fn origin_allowed(origin: &str, allowed: &[String], allow_localhost: bool) -> bool {
    let origin = origin.trim_end_matches('/');
    allowed
        .iter()
        .any(|o| o.trim_end_matches('/') == origin)
        || (allow_localhost && is_localhost_origin(origin))
}

/// CORS policy from the configured origins.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allowed = config.cors_allowed_origins.clone();
    let allow_localhost = config.cors_allow_localhost;

    let mut headers: Vec<HeaderName> = ALLOWED_HEADERS
        .into_iter()
        .map(HeaderName::from_static)
        .collect();
    headers.push(header::CONTENT_TYPE);

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &request::Parts| {
                origin
                    .to_str()
                    .is_ok_and(|o| origin_allowed(o, &allowed, allow_localhost))
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(headers)
}

/// Build the application router.
///
/// Routes:
/// - GET/POST/DELETE /api/profiles/
/// - GET/POST/DELETE /api/credentials/
/// - GET /health (unauthenticated)
///
/// Other methods on the API paths get 405 from the router.
pub fn build_router(state: GatewayState, config: &ServerConfig) -> Router {
    let profiles: MethodRouter<GatewayState> = get(handlers::get_profile)
        .post(handlers::post_profile)
        .delete(handlers::delete_profile);
    let credentials: MethodRouter<GatewayState> = get(handlers::get_credential)
        .post(handlers::post_credential)
        .delete(handlers::delete_credential);

    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/profiles", profiles.clone())
        .route("/api/profiles/", profiles)
        .route("/api/credentials", credentials.clone())
        .route("/api/credentials/", credentials)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), CryptumError> {
    let app = build_router(state, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CryptumError::Internal(format!("failed to bind to {addr}: {e}")))?;

    tracing::info!("Cryptum server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CryptumError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
