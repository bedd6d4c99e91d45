//! Storage client, S3 configuration and the S3 backend.
//!
//! [`StorageClient`] is a cloneable handle over any [`StorageBackend`] and
//! hands out the instrumented operation groups. [`S3Backend`] talks to AWS S3
//! or any S3-compatible endpoint through the official SDK.
//!
//! [`StorageBackend`]: crate::StorageBackend

mod s3_backend;
mod s3_config;
mod s3_credentials;
mod storage_client;

pub use s3_backend::S3Backend;
pub use s3_config::S3Config;
pub use s3_credentials::S3Credentials;
pub use storage_client::StorageClient;
