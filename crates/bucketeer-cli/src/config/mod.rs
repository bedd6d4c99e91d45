//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── storage: StorageConfig   # Backend, credentials, region, endpoint
//! └── scenario: ScenarioConfig # Settle delay, name log, demo assets
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables, and every option has a default, so running without arguments
//! performs the standard demo run against AWS S3.
//!
//! # Example
//!
//! ```bash
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... bucketeer
//! bucketeer --backend memory --settle-delay-secs 0
//! ```

mod scenario;
mod storage;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use scenario::ScenarioConfig;
use serde::{Deserialize, Serialize};
pub use storage::StorageConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "bucketeer")]
#[command(about = "Runs a create/read/update/delete sequence against S3-compatible storage")]
#[command(version)]
pub struct Cli {
    /// Storage backend and connection configuration.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Demo sequence configuration.
    #[clap(flatten)]
    pub scenario: ScenarioConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that its
    /// values act as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.storage
            .validate()
            .context("invalid storage configuration")?;
        self.scenario
            .validate()
            .context("invalid scenario configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.storage.log();
        self.scenario.log();

        tracing::debug!(target: TRACING_TARGET_CONFIG, "Configuration loaded");
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::storage::Backend;
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let cli = Cli::try_parse_from(["bucketeer", "--backend", "memory"]).unwrap();

        assert_eq!(cli.storage.backend, Backend::Memory);
        assert_eq!(cli.scenario.settle_delay_secs, 5);
        assert_eq!(cli.scenario.name_log.to_str(), Some("randomBucketName.txt"));
        assert_eq!(
            cli.scenario.extra_buckets,
            vec!["bucket1", "bucket2", "bucket3"]
        );
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_s3_backend_requires_credentials() {
        let cli = Cli::try_parse_from([
            "bucketeer",
            "--backend",
            "s3",
            "--access-key-id",
            "",
            "--secret-access-key",
            "",
        ])
        .unwrap();

        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_extra_buckets_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "bucketeer",
            "--backend",
            "memory",
            "--extra-buckets",
            "one,two",
        ])
        .unwrap();

        assert_eq!(cli.scenario.extra_buckets, vec!["one", "two"]);
    }
}
