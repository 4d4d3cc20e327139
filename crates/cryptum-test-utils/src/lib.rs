// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Cryptum integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - Full server stack over a temp SQLite database
//! - [`TestClient`] - Signing client producing vault HTTP requests

pub mod client;
pub mod harness;

pub use client::TestClient;
pub use harness::{TestHarness, TestHarnessBuilder, TestResponse};
