//! Bucket information returned by bucket listings.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name.
    pub name: String,
    /// Bucket creation date, when reported by the service.
    pub creation_date: Option<Timestamp>,
}

impl BucketInfo {
    /// Creates a new BucketInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: None,
        }
    }

    /// Sets the creation date.
    pub fn with_creation_date(mut self, creation_date: Timestamp) -> Self {
        self.creation_date = Some(creation_date);
        self
    }
}

impl fmt::Display for BucketInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.creation_date {
            Some(created) => write!(f, "{} (created {created})", self.name),
            None => f.write_str(&self.name),
        }
    }
}
