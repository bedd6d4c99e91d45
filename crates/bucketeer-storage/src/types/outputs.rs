//! Results of mutating operations.

use serde::{Deserialize, Serialize};

/// Result of a create bucket operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBucketOutput {
    /// Location reported by the service for the new bucket.
    pub location: String,
}

/// Result of an upload operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutput {
    /// Object key that was written.
    pub key: String,
    /// Size of the uploaded body in bytes.
    pub size: u64,
    /// ETag of the new object, if the backend provides one.
    pub etag: Option<String>,
    /// URL the object can be addressed by.
    pub location: String,
}

/// Result of a server-side copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOutput {
    /// Destination key.
    pub key: String,
    /// ETag of the destination object, if the backend provides one.
    pub etag: Option<String>,
}

/// Result of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteObjectsOutput {
    /// Keys the service reported as deleted.
    pub deleted: Vec<String>,
}
