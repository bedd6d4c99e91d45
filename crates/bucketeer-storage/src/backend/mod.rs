//! Storage backend trait and implementations.
//!
//! [`StorageBackend`] is the seam between the instrumented operations and
//! the remote service. Each method maps to exactly one request against the
//! backing store; nothing here retries, paginates, or verifies integrity.

use std::pin::Pin;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::Result;
use crate::types::{
    BucketInfo, CopyOutput, CreateBucketOutput, DeleteObjectsOutput, ObjectInfo, UploadOutput,
};

mod memory;

pub use memory::{MemoryBackend, Request};

/// Streaming body of a downloaded object.
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// A bucket-addressed object store.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Short identifier used in logs (e.g. "s3", "memory").
    fn id(&self) -> &'static str;

    /// Creates a new bucket.
    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketOutput>;

    /// Lists every bucket visible to the configured credentials.
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// Deletes a bucket. Fails if the bucket still holds objects.
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Writes `body` under `key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<UploadOutput>;

    /// Returns a single page of objects in `bucket`.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>>;

    /// Copies `source_key` to `dest_key` within `bucket`.
    ///
    /// The source object is left in place.
    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str)
    -> Result<CopyOutput>;

    /// Deletes one object. Deleting a missing key succeeds.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Deletes every key in `keys` with a single request.
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteObjectsOutput>;

    /// Opens the body of an object for streaming.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader>;
}
