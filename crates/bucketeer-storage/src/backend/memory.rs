//! In-process backend with S3 bucket and key semantics.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::{ObjectReader, StorageBackend};
use crate::types::{
    BucketInfo, CopyOutput, CreateBucketOutput, DeleteObjectsOutput, ObjectInfo, UploadOutput,
};
use crate::{Error, Result};

/// A request received by a [`MemoryBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateBucket { bucket: String },
    ListBuckets,
    DeleteBucket { bucket: String },
    PutObject { bucket: String, key: String },
    ListObjects { bucket: String },
    CopyObject { bucket: String, source_key: String, dest_key: String },
    DeleteObject { bucket: String, key: String },
    DeleteObjects { bucket: String, keys: Vec<String> },
    GetObject { bucket: String, key: String },
}

#[derive(Debug, Default)]
struct State {
    buckets: BTreeMap<String, BTreeMap<String, Bytes>>,
    requests: Vec<Request>,
}

/// Object store held entirely in memory.
///
/// Mirrors the S3 behaviours the exerciser depends on: bucket names are
/// unique, non-empty buckets cannot be deleted, and deleting a missing key is
/// not an error. Every request is journaled so callers can inspect how many
/// requests were issued and in which order.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// Returns whether `bucket` exists.
    pub fn contains_bucket(&self, bucket: &str) -> bool {
        self.lock().buckets.contains_key(bucket)
    }

    /// Returns the stored body of `bucket/key`.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.lock()
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Journals `request` and returns the locked state.
    fn record(&self, request: Request) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        state.requests.push(request);
        state
    }
}

impl State {
    fn bucket(&self, bucket: &str) -> Result<&BTreeMap<String, Bytes>> {
        self.buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(bucket))
    }

    fn bucket_mut(&mut self, bucket: &str) -> Result<&mut BTreeMap<String, Bytes>> {
        self.buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))
    }
}

fn no_such_bucket(bucket: &str) -> Error {
    Error::NotFound(format!("NoSuchBucket: bucket '{bucket}' does not exist"))
}

fn no_such_key(bucket: &str, key: &str) -> Error {
    Error::NotFound(format!("NoSuchKey: '{bucket}/{key}' does not exist"))
}

#[async_trait::async_trait]
impl StorageBackend for MemoryBackend {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketOutput> {
        let mut state = self.record(Request::CreateBucket {
            bucket: bucket.to_owned(),
        });

        if state.buckets.contains_key(bucket) {
            return Err(Error::Conflict(format!(
                "BucketAlreadyOwnedByYou: bucket '{bucket}' already exists"
            )));
        }

        state.buckets.insert(bucket.to_owned(), BTreeMap::new());
        Ok(CreateBucketOutput {
            location: format!("/{bucket}"),
        })
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let state = self.record(Request::ListBuckets);
        Ok(state.buckets.keys().map(BucketInfo::new).collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.record(Request::DeleteBucket {
            bucket: bucket.to_owned(),
        });

        if !state.bucket(bucket)?.is_empty() {
            return Err(Error::Conflict(format!(
                "BucketNotEmpty: bucket '{bucket}' is not empty"
            )));
        }

        state.buckets.remove(bucket);
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<UploadOutput> {
        let mut state = self.record(Request::PutObject {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        });

        let size = body.len() as u64;
        state.bucket_mut(bucket)?.insert(key.to_owned(), body);

        Ok(UploadOutput {
            key: key.to_owned(),
            size,
            etag: None,
            location: format!("memory://{bucket}/{key}"),
        })
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let state = self.record(Request::ListObjects {
            bucket: bucket.to_owned(),
        });

        let objects = state
            .bucket(bucket)?
            .iter()
            .map(|(key, body)| ObjectInfo::new(key.clone(), body.len() as u64))
            .collect();
        Ok(objects)
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        dest_key: &str,
    ) -> Result<CopyOutput> {
        let mut state = self.record(Request::CopyObject {
            bucket: bucket.to_owned(),
            source_key: source_key.to_owned(),
            dest_key: dest_key.to_owned(),
        });

        let objects = state.bucket_mut(bucket)?;
        let body = objects
            .get(source_key)
            .cloned()
            .ok_or_else(|| no_such_key(bucket, source_key))?;
        objects.insert(dest_key.to_owned(), body);

        Ok(CopyOutput {
            key: dest_key.to_owned(),
            etag: None,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.record(Request::DeleteObject {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        });

        state.bucket_mut(bucket)?.remove(key);
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteObjectsOutput> {
        let mut state = self.record(Request::DeleteObjects {
            bucket: bucket.to_owned(),
            keys: keys.to_vec(),
        });

        let objects = state.bucket_mut(bucket)?;
        for key in keys {
            objects.remove(key);
        }

        Ok(DeleteObjectsOutput {
            deleted: keys.to_vec(),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        let state = self.record(Request::GetObject {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        });

        let body = state
            .bucket(bucket)?
            .get(key)
            .cloned()
            .ok_or_else(|| no_such_key(bucket, key))?;
        Ok(Box::pin(Cursor::new(body)))
    }
}
