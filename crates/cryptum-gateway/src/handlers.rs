// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the profile and credential endpoints.
//!
//! Every handler authenticates first; nothing reaches storage until the
//! request has passed header, encoding, freshness, and signature checks.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use cryptum_auth::AuthenticatedRequest;
use cryptum_core::types::ClearOutcome;
use cryptum_core::{HealthStatus, Operation, PluginAdapter};
use serde::Serialize;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Success body for mutating operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

fn authenticate(
    state: &GatewayState,
    operation: Operation,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<AuthenticatedRequest, ApiError> {
    state
        .authenticator
        .authenticate(operation, headers, body)
        .map_err(|e| ApiError::new(operation, e))
}

// Present whenever the operation table requires the header.
fn required(value: Option<String>, operation: Operation, name: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::new(operation, cryptum_core::AuthError::missing(name)))
}

/// GET /api/profiles/
///
/// Returns the stored services blob, or 204 when nothing is stored.
pub async fn get_profile(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let op = Operation::ProfileGet;
    let request = authenticate(&state, op, &headers, &[])?;

    let services = state
        .profiles
        .services(&request.public_key)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(match services {
        Some(blob) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            blob,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// POST /api/profiles/
///
/// Replaces the services blob with the signed body payload.
pub async fn post_profile(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let op = Operation::ProfilePost;
    let request = authenticate(&state, op, &headers, &body)?;

    state
        .profiles
        .set_services(&request.public_key, &request.payload)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(MessageResponse::new("Services updated").into_response())
}

/// DELETE /api/profiles/
///
/// Clears the services blob. 204 when it was already empty.
pub async fn delete_profile(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let op = Operation::ProfileDelete;
    let request = authenticate(&state, op, &headers, &[])?;

    let outcome = state
        .profiles
        .clear_services(&request.public_key)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(match outcome {
        ClearOutcome::Cleared => MessageResponse::new("Services deleted").into_response(),
        ClearOutcome::AlreadyEmpty => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /api/credentials/
///
/// Returns the credential's entropy as a JSON string.
pub async fn get_credential(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Json<String>, ApiError> {
    let op = Operation::CredentialGet;
    let request = authenticate(&state, op, &headers, &[])?;
    let pin = required(request.hashed_pin, op, cryptum_auth::header::HASHED_PIN)?;
    let protector = required(request.protector, op, cryptum_auth::header::PROTECTOR)?;

    let credential = state
        .credentials
        .lookup(&request.public_key, &protector, Some(&pin))
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(Json(credential.entropy.unwrap_or_default()))
}

/// POST /api/credentials/
///
/// Stores the signed entropy payload and returns the new protector as a JSON string.
pub async fn post_credential(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<String>, ApiError> {
    let op = Operation::CredentialPost;
    let request = authenticate(&state, op, &headers, &body)?;
    let pin = required(request.hashed_pin, op, cryptum_auth::header::HASHED_PIN)?;

    let protector = state
        .credentials
        .create(&request.public_key, &pin, &request.payload)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(Json(protector))
}

/// DELETE /api/credentials/
pub async fn delete_credential(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let op = Operation::CredentialDelete;
    let request = authenticate(&state, op, &headers, &[])?;
    let protector = required(request.protector, op, cryptum_auth::header::PROTECTOR)?;

    state
        .credentials
        .delete(&request.public_key, &protector)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(MessageResponse::new("Credential deleted"))
}

/// GET /health
///
/// Unauthenticated liveness probe backed by the storage health check.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (status, label) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            tracing::warn!(%reason, "storage degraded");
            (StatusCode::OK, "degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            tracing::error!(%reason, "storage unhealthy");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
        Err(e) => {
            tracing::error!(error = %e, "storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.health.start_time.elapsed().as_secs(),
        }),
    )
        .into_response()
}
