//! Object operations.
//!
//! Upload, listing, server-side copy, single and batch deletion, and
//! streaming download of objects within a bucket.

use bytes::Bytes;
use tracing::{debug, error, info, instrument, warn};

use super::ensure_named;
use crate::backend::ObjectReader;
use crate::types::{CopyOutput, DeleteObjectsOutput, ObjectInfo, UploadOutput};
use crate::{Result, StorageClient, TRACING_TARGET_OBJECTS};

/// Object operations over a storage client.
#[derive(Debug, Clone)]
pub struct ObjectOperations {
    client: StorageClient,
}

impl ObjectOperations {
    /// Creates new ObjectOperations with a storage client.
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }

    /// Uploads an in-memory body under `key`.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Name of the bucket
    /// * `key` - Object key/path
    /// * `data` - Object body as bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket does not exist or the upload fails.
    #[instrument(skip(self, data), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: impl Into<Bytes>,
    ) -> Result<UploadOutput> {
        ensure_named("Bucket name", bucket)?;
        ensure_named("Object key", key)?;

        let data = data.into();
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = data.len(),
            "Uploading object"
        );

        let start = std::time::Instant::now();
        let result = self.client.as_inner().put_object(bucket, key, data).await;
        let elapsed = start.elapsed();

        match result {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    size = output.size,
                    location = %output.location,
                    elapsed = ?elapsed,
                    "Object uploaded successfully"
                );
                Ok(output)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to upload object"
                );
                Err(e)
            }
        }
    }

    /// Lists the first page of objects in a bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket))]
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        ensure_named("Bucket name", bucket)?;
        debug!(target: TRACING_TARGET_OBJECTS, bucket = %bucket, "Listing objects");

        let start = std::time::Instant::now();
        let result = self.client.as_inner().list_objects(bucket).await;
        let elapsed = start.elapsed();

        match result {
            Ok(objects) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    count = objects.len(),
                    elapsed = ?elapsed,
                    "Objects listed successfully"
                );
                Ok(objects)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to list objects"
                );
                Err(e)
            }
        }
    }

    /// Copies `source_key` to `dest_key` within `bucket`.
    ///
    /// The source object is not removed; deleting it is up to the caller.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Name of the bucket holding both objects
    /// * `source_key` - Key to copy from
    /// * `dest_key` - Key to copy to
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not exist or the copy fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, from = %source_key, to = %dest_key))]
    pub async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        dest_key: &str,
    ) -> Result<CopyOutput> {
        ensure_named("Bucket name", bucket)?;
        ensure_named("Source key", source_key)?;
        ensure_named("Destination key", dest_key)?;
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            from = %source_key,
            to = %dest_key,
            "Copying object"
        );

        let start = std::time::Instant::now();
        let result = self
            .client
            .as_inner()
            .copy_object(bucket, source_key, dest_key)
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    from = %source_key,
                    to = %dest_key,
                    elapsed = ?elapsed,
                    "Object copied successfully"
                );
                Ok(output)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    from = %source_key,
                    to = %dest_key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to copy object"
                );
                Err(e)
            }
        }
    }

    /// Deletes an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        ensure_named("Bucket name", bucket)?;
        ensure_named("Object key", key)?;
        debug!(target: TRACING_TARGET_OBJECTS, bucket = %bucket, key = %key, "Deleting object");

        let start = std::time::Instant::now();
        let result = self.client.as_inner().delete_object(bucket, key).await;
        let elapsed = start.elapsed();

        match result {
            Ok(()) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    elapsed = ?elapsed,
                    "Object deleted successfully"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to delete object"
                );
                Err(e)
            }
        }
    }

    /// Deletes multiple objects in a single request.
    ///
    /// An empty key list is a no-op and sends nothing.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Name of the bucket
    /// * `keys` - Keys to delete, sent in one request
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports a
    /// failure for any key.
    #[instrument(skip(self, keys), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, count = keys.len()))]
    pub async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteObjectsOutput> {
        ensure_named("Bucket name", bucket)?;
        if keys.is_empty() {
            warn!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                "No keys provided for batch deletion"
            );
            return Ok(DeleteObjectsOutput::default());
        }

        let count = keys.len();
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count = count,
            "Deleting multiple objects"
        );

        let start = std::time::Instant::now();
        let result = self.client.as_inner().delete_objects(bucket, keys).await;
        let elapsed = start.elapsed();

        match result {
            Ok(output) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    count = count,
                    deleted = output.deleted.len(),
                    elapsed = ?elapsed,
                    "Objects deleted successfully"
                );
                Ok(output)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    count = count,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to delete objects"
                );
                Err(e)
            }
        }
    }

    /// Opens an object for streaming download.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Name of the bucket
    /// * `key` - Object key/path
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or the request fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn download_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        ensure_named("Bucket name", bucket)?;
        ensure_named("Object key", key)?;
        debug!(target: TRACING_TARGET_OBJECTS, bucket = %bucket, key = %key, "Downloading object");

        let start = std::time::Instant::now();
        let result = self.client.as_inner().get_object(bucket, key).await;
        let elapsed = start.elapsed();

        match result {
            Ok(reader) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    elapsed = ?elapsed,
                    "Object stream opened"
                );
                Ok(reader)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to download object"
                );
                Err(e)
            }
        }
    }
}
