//! Demo sequence configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Longest pause allowed between steps, in seconds.
const MAX_SETTLE_DELAY_SECS: u64 = 300;

/// Configuration of the fixed demo sequence.
///
/// The defaults reproduce the standard run: two sample images from
/// `/assets`, a five second pause between steps, and three extra bucket
/// names for the multi-bucket delete.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ScenarioConfig {
    /// Seconds to wait after each step for the remote service to settle.
    #[arg(long, env = "SETTLE_DELAY_SECS", default_value_t = 5)]
    pub settle_delay_secs: u64,

    /// File the generated bucket name is appended to.
    #[arg(long, env = "NAME_LOG_PATH", default_value = "randomBucketName.txt")]
    pub name_log: PathBuf,

    /// First local file to upload (stored as `football.jpg`).
    #[arg(long, default_value = "/assets/daniel-norin-lBhhnhndpE0-unsplash.jpg")]
    pub first_asset: PathBuf,

    /// Second local file to upload (stored as `code.jpg`).
    #[arg(long, default_value = "/assets/florian-olivo-4hbJ-eymZ1o-unsplash.jpg")]
    pub second_asset: PathBuf,

    /// Buckets removed by the multi-bucket delete step.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "bucket1,bucket2,bucket3"
    )]
    pub extra_buckets: Vec<String>,

    /// Local path the final download is written to.
    #[arg(long, default_value = "football.jpg")]
    pub download_path: PathBuf,
}

impl ScenarioConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the settle delay exceeds five minutes.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.settle_delay_secs > MAX_SETTLE_DELAY_SECS {
            return Err(anyhow!(
                "Settle delay {} seconds is invalid. Must be at most {MAX_SETTLE_DELAY_SECS} seconds.",
                self.settle_delay_secs
            ));
        }

        Ok(())
    }

    /// Returns the settle delay as a `Duration`.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Logs scenario configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            settle_delay_secs = self.settle_delay_secs,
            name_log = %self.name_log.display(),
            first_asset = %self.first_asset.display(),
            second_asset = %self.second_asset.display(),
            extra_buckets = ?self.extra_buckets,
            download_path = %self.download_path.display(),
            "Scenario configuration"
        );
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: 5,
            name_log: PathBuf::from("randomBucketName.txt"),
            first_asset: PathBuf::from("/assets/daniel-norin-lBhhnhndpE0-unsplash.jpg"),
            second_asset: PathBuf::from("/assets/florian-olivo-4hbJ-eymZ1o-unsplash.jpg"),
            extra_buckets: vec!["bucket1".into(), "bucket2".into(), "bucket3".into()],
            download_path: PathBuf::from("football.jpg"),
        }
    }
}
