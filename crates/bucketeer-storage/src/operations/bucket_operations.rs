//! Bucket operations.

use tracing::{debug, error, info, instrument};

use super::ensure_named;
use crate::types::{BucketInfo, CreateBucketOutput};
use crate::{Result, StorageClient, TRACING_TARGET_BUCKETS};

/// Bucket operations over a storage client.
#[derive(Debug, Clone)]
pub struct BucketOperations {
    client: StorageClient,
}

impl BucketOperations {
    /// Creates new BucketOperations with a storage client.
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }

    /// Creates a new bucket.
    ///
    /// # Arguments
    ///
    /// * `bucket_name` - Name of the bucket to create
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the bucket already exists, or
    /// the request fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn create_bucket(&self, bucket_name: &str) -> Result<CreateBucketOutput> {
        ensure_named("Bucket name", bucket_name)?;
        debug!(target: TRACING_TARGET_BUCKETS, bucket = %bucket_name, "Creating bucket");

        let start = std::time::Instant::now();
        let result = self.client.as_inner().create_bucket(bucket_name).await;
        let elapsed = start.elapsed();

        match result {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    location = %output.location,
                    elapsed = ?elapsed,
                    "Bucket created successfully"
                );
                Ok(output)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to create bucket"
                );
                Err(e)
            }
        }
    }

    /// Deletes a bucket.
    ///
    /// # Arguments
    ///
    /// * `bucket_name` - Name of the bucket to delete
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket does not exist, still holds objects,
    /// or the request fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn delete_bucket(&self, bucket_name: &str) -> Result<()> {
        ensure_named("Bucket name", bucket_name)?;
        debug!(target: TRACING_TARGET_BUCKETS, bucket = %bucket_name, "Deleting bucket");

        let start = std::time::Instant::now();
        let result = self.client.as_inner().delete_bucket(bucket_name).await;
        let elapsed = start.elapsed();

        match result {
            Ok(()) => {
                info!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    elapsed = ?elapsed,
                    "Bucket deleted successfully"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to delete bucket"
                );
                Err(e)
            }
        }
    }

    /// Lists all buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket listing fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        debug!(target: TRACING_TARGET_BUCKETS, "Listing buckets");

        let start = std::time::Instant::now();
        let result = self.client.as_inner().list_buckets().await;
        let elapsed = start.elapsed();

        match result {
            Ok(buckets) => {
                info!(
                    target: TRACING_TARGET_BUCKETS,
                    count = buckets.len(),
                    elapsed = ?elapsed,
                    "Buckets listed successfully"
                );
                Ok(buckets)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to list buckets"
                );
                Err(e)
            }
        }
    }
}
