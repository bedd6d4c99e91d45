//! Storage backend configuration.

use anyhow::{Context, anyhow};
use bucketeer_storage::{MemoryBackend, S3Backend, S3Config, S3Credentials, StorageClient};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::TRACING_TARGET_CONFIG;

/// Which storage implementation the run talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[derive(strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// AWS S3 or an S3-compatible endpoint.
    S3,
    /// In-process store, for dry runs.
    Memory,
}

/// Storage configuration.
///
/// # Environment Variables
///
/// - `AWS_ACCESS_KEY_ID` - Access key identifier
/// - `AWS_SECRET_ACCESS_KEY` - Secret access key
/// - `AWS_REGION` - Region (default: us-east-1)
/// - `S3_ENDPOINT_URL` - Custom S3-compatible endpoint
/// - `S3_PATH_STYLE` - Use path-style addressing (default: false)
/// - `BUCKETEER_BACKEND` - `s3` or `memory` (default: s3)
#[derive(Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// Storage implementation to run against.
    #[arg(long, env = "BUCKETEER_BACKEND", value_enum, default_value_t = Backend::S3)]
    pub backend: Backend,

    /// Access key identifier.
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    /// Secret access key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub secret_access_key: Option<String>,

    /// Region requests are signed for.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom endpoint for S3-compatible services such as MinIO.
    #[arg(long, env = "S3_ENDPOINT_URL")]
    pub endpoint_url: Option<Url>,

    /// Address buckets by path instead of by virtual host.
    #[arg(long, env = "S3_PATH_STYLE", default_value_t = false)]
    pub path_style: bool,
}

impl StorageConfig {
    /// Validates the configuration for the selected backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the S3 backend is selected without credentials or
    /// with an endpoint that is not http(s).
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend == Backend::Memory {
            return Ok(());
        }

        if self.access_key_id.as_deref().is_none_or(str::is_empty) {
            return Err(anyhow!(
                "Access key is required for the s3 backend. Set AWS_ACCESS_KEY_ID."
            ));
        }

        if self.secret_access_key.as_deref().is_none_or(str::is_empty) {
            return Err(anyhow!(
                "Secret key is required for the s3 backend. Set AWS_SECRET_ACCESS_KEY."
            ));
        }

        if let Some(endpoint) = &self.endpoint_url
            && !matches!(endpoint.scheme(), "http" | "https")
        {
            return Err(anyhow!(
                "Endpoint scheme '{}' is invalid. Use http or https.",
                endpoint.scheme()
            ));
        }

        Ok(())
    }

    /// Returns the S3 credentials, if both halves are configured.
    pub fn credentials(&self) -> Option<S3Credentials> {
        let access_key = self.access_key_id.as_deref()?;
        let secret_key = self.secret_access_key.as_deref()?;
        Some(S3Credentials::new(access_key, secret_key))
    }

    /// Builds the storage client for the selected backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the S3 client cannot be configured.
    pub fn build_client(&self) -> anyhow::Result<StorageClient> {
        match self.backend {
            Backend::Memory => Ok(StorageClient::new(MemoryBackend::new())),
            Backend::S3 => {
                let credentials = self
                    .credentials()
                    .context("missing S3 credentials")?;

                let mut config =
                    S3Config::new(self.region.clone(), credentials).with_path_style(self.path_style);
                if let Some(endpoint) = &self.endpoint_url {
                    config = config
                        .with_endpoint(endpoint.clone())
                        .context("invalid S3 endpoint")?;
                }

                let backend = S3Backend::new(config).context("failed to create S3 client")?;
                Ok(StorageClient::new(backend))
            }
        }
    }

    /// Logs storage configuration at info level.
    pub fn log(&self) {
        let access_key = self
            .credentials()
            .map(|credentials| credentials.access_key_masked());

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            backend = %self.backend,
            region = %self.region,
            endpoint = ?self.endpoint_url.as_ref().map(Url::as_str),
            path_style = self.path_style,
            access_key = ?access_key,
            "Storage configuration"
        );
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("access_key_id", &self.credentials().map(|c| c.access_key_masked()))
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("path_style", &self.path_style)
            .finish_non_exhaustive()
    }
}
