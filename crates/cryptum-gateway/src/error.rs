// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of domain errors onto HTTP responses.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cryptum_core::{CryptumError, Operation};
use serde::Serialize;

pub(crate) const UNKNOWN_PUBLIC_KEY: &str = "Public key not recognized";
pub(crate) const NO_MATCHING_CREDENTIAL: &str = "No matching credential";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// A failed request, tagged with the operation it belongs to.
#[derive(Debug)]
pub struct ApiError {
    operation: Operation,
    error: CryptumError,
}

impl ApiError {
    pub fn new(operation: Operation, error: impl Into<CryptumError>) -> Self {
        Self {
            operation,
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            CryptumError::Auth(_) => StatusCode::BAD_REQUEST,
            CryptumError::NotFound { .. } => StatusCode::FORBIDDEN,
            CryptumError::Config(_) | CryptumError::Storage { .. } | CryptumError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let operation = self.operation;
        match self.error {
            CryptumError::Auth(err) => {
                tracing::warn!(%operation, field = err.field(), "request rejected: {err}");
                let body = BTreeMap::from([(err.field().to_string(), err.to_string())]);
                (status, Json(body)).into_response()
            }
            CryptumError::NotFound { entity } => {
                tracing::warn!(%operation, %entity, "request forbidden");
                let error = if entity == "profile" {
                    UNKNOWN_PUBLIC_KEY
                } else {
                    NO_MATCHING_CREDENTIAL
                };
                (
                    status,
                    Json(ErrorResponse {
                        error: error.to_string(),
                    }),
                )
                    .into_response()
            }
            other => {
                tracing::error!(%operation, error = %other, "request failed");
                (
                    status,
                    Json(ErrorResponse {
                        error: other.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
