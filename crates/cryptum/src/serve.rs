// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cryptum serve`: run the vault HTTP server.

use std::sync::Arc;

use cryptum_config::CryptumConfig;
use cryptum_core::{CryptumError, PluginAdapter, StorageAdapter};
use cryptum_gateway::{GatewayState, start_server};
use cryptum_storage::SqliteStorage;
use tracing::{error, info};

/// Initialize storage, serve until Ctrl-C, then flush storage.
pub async fn run_serve(config: CryptumConfig) -> Result<(), CryptumError> {
    init_tracing(&config.server.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.storage.database_path,
        "starting cryptum serve"
    );

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

    let state = GatewayState::new(storage.clone(), &config);
    let result = start_server(&config.server, state).await;

    if let Err(e) = storage.shutdown().await {
        error!(error = %e, "storage shutdown failed");
    }
    result
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cryptum={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
