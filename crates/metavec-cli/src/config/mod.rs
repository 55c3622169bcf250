//! Command line and environment configuration.
//!
//! Every option has an environment variable fallback; with the `dotenv`
//! feature a `.env` file in the working directory is read first.

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use middleware::MiddlewareConfig;
use metavec_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// All settings of the `metavec` binary.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "metavec")]
#[command(about = "Converts stored metadata records into vector embeddings")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub server: ServerConfig,

    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Reads `.env` when enabled, then parses arguments and environment.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        // Tracing is not installed yet.
        match dotenvy::dotenv() {
            Err(err) if !err.not_found() => eprintln!("warning: ignoring .env file: {err}"),
            _ => {}
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Installs the fmt subscriber; `RUST_LOG` overrides the `info` default.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Checks everything that can be checked before connecting.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs the effective configuration without credentials.
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            backend = %self.service.storage.backend_type,
            root = %self.service.storage.root,
            metadata_namespace = %self.service.pipeline.metadata_namespace,
            embeddings_namespace = %self.service.pipeline.embeddings_namespace,
            "Storage configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            provider = %self.service.embedding.provider,
            model = %self.service.embedding.model,
            max_concurrent_jobs = self.service.pipeline.max_concurrent_jobs,
            embedding_timeout_secs = self.service.pipeline.embedding_timeout_secs,
            "Embedding configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "fs").then_some("fs"),
            cfg!(feature = "s3").then_some("s3"),
            cfg!(feature = "azblob").then_some("azblob"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
