#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "bucketeer_storage::client";
pub const TRACING_TARGET_BUCKETS: &str = "bucketeer_storage::buckets";
pub const TRACING_TARGET_OBJECTS: &str = "bucketeer_storage::objects";

pub mod backend;
pub mod client;
pub mod operations;
pub mod types;

// Re-export for convenience
pub use crate::backend::{MemoryBackend, ObjectReader, Request, StorageBackend};
pub use crate::client::{S3Backend, S3Config, S3Credentials, StorageClient};
pub use crate::operations::{BucketOperations, ObjectOperations};
pub use crate::types::{
    BucketInfo, CopyOutput, CreateBucketOutput, DeleteObjectsOutput, ObjectInfo, UploadOutput,
};

/// Error type for object storage operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Invalid or missing client settings such as empty credentials or a
    /// malformed endpoint URL.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request or malformed data.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The bucket or object does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state of the resource.
    ///
    /// Returned when creating a bucket that already exists or deleting a
    /// bucket that still holds objects.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The remote service rejected or failed the request.
    #[error("{operation} failed: {message}")]
    Service {
        /// Name of the remote operation, e.g. `PutObject`.
        operation: &'static str,
        /// Error code and message reported by the service.
        message: String,
    },
}

impl Error {
    /// Returns whether this error indicates a configuration issue.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Returns whether this error indicates a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns whether this error indicates a state conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

/// Specialized [`Result`] type for storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
