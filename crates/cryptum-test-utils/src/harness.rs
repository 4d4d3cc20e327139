// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full server stack over a temp SQLite
//! database and drives the axum router in-process.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use cryptum_config::CryptumConfig;
use cryptum_core::{CryptumError, StorageAdapter};
use cryptum_gateway::{GatewayState, build_router};
use cryptum_storage::SqliteStorage;
use tower::ServiceExt;

use crate::client::TestClient;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    max_per_profile: Option<usize>,
    timestamp_tolerance_secs: Option<u32>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            max_per_profile: None,
            timestamp_tolerance_secs: None,
        }
    }

    /// Override the per-profile credential capacity.
    pub fn with_capacity(mut self, max_per_profile: usize) -> Self {
        self.max_per_profile = Some(max_per_profile);
        self
    }

    /// Override the timestamp freshness window.
    pub fn with_tolerance(mut self, secs: u32) -> Self {
        self.timestamp_tolerance_secs = Some(secs);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, CryptumError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| CryptumError::Storage { source: e.into() })?;

        let mut config = CryptumConfig::default();
        config.storage.database_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .into_owned();
        if let Some(capacity) = self.max_per_profile {
            config.credentials.max_per_profile = capacity;
        }
        if let Some(secs) = self.timestamp_tolerance_secs {
            config.auth.timestamp_tolerance_secs = secs;
        }

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let state = GatewayState::new(storage.clone(), &config);
        let router = build_router(state, &config.server);

        Ok(TestHarness {
            storage,
            router,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A complete server stack over temp storage.
pub struct TestHarness {
    /// The storage backend, for provisioning and direct assertions.
    pub storage: Arc<dyn StorageAdapter>,
    pub router: Router,
    pub config: CryptumConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A client whose public key has been provisioned as a profile.
    pub async fn provisioned_client(&self) -> TestClient {
        let client = TestClient::generate();
        self.storage
            .create_profile(&client.public_key())
            .await
            .unwrap();
        client
    }

    /// Send a request through the router and buffer the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }
}
