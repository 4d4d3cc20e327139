// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP boundary for the Cryptum vault server.
//!
//! Exposes the profile and credential endpoints over axum. Requests are
//! authenticated with `cryptum-auth` before they reach the vault services.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, build_router, cors_layer, start_server};
