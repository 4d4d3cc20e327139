// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptum - a signed-request vault server.
//!
//! This is the binary entry point: the HTTP server plus profile
//! provisioning commands.

mod keys;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cryptum - a signed-request vault server.
#[derive(Parser, Debug)]
#[command(name = "cryptum", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the vault HTTP server.
    Serve,
    /// Provision a profile for a base64 Ed25519 public key.
    AddKey {
        /// Base64 public key, exactly as clients send it.
        public_key: String,
    },
    /// Delete a profile and all of its credentials.
    DeleteKey {
        /// Base64 public key, exactly as clients send it.
        public_key: String,
    },
    /// List a profile's credentials (ids and creation times only).
    ListCredentials {
        /// Base64 public key, exactly as clients send it.
        public_key: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => cryptum_config::load_and_validate_path(path),
        None => cryptum_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            cryptum_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await.map(|()| None),
        Some(Commands::AddKey { public_key }) => {
            keys::add_key(&config.storage, &public_key).await.map(Some)
        }
        Some(Commands::DeleteKey { public_key }) => {
            keys::delete_key(&config.storage, &public_key).await.map(Some)
        }
        Some(Commands::ListCredentials { public_key }) => {
            keys::list_credentials(&config.storage, &public_key)
                .await
                .map(Some)
        }
        None => Ok(Some("cryptum: use --help for available commands".to_string())),
    };

    match result {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(e) => {
            eprintln!("cryptum: {e}");
            std::process::exit(1);
        }
    }
}
