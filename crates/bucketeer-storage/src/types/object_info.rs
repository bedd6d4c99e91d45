//! Object information returned by object listings.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: Option<Timestamp>,
    /// ETag of the object.
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            etag: None,
        }
    }

    /// Sets the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

impl fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.key, self.size)
    }
}
