//! Cloneable handle over a storage backend.

use std::sync::Arc;

use crate::backend::StorageBackend;
use crate::operations::{BucketOperations, ObjectOperations};

/// High-level storage client.
///
/// Owns the backend behind an [`Arc`] so clones are cheap and every
/// operation group shares one connection pool.
#[derive(Clone)]
pub struct StorageClient {
    backend: Arc<dyn StorageBackend>,
}

impl StorageClient {
    /// Creates a client over `backend`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucketeer_storage::{MemoryBackend, StorageClient};
    ///
    /// let client = StorageClient::new(MemoryBackend::new());
    /// assert_eq!(client.backend_id(), "memory");
    /// ```
    pub fn new(backend: impl StorageBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates a client over an already shared backend.
    pub fn from_shared(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Returns the backend identifier.
    pub fn backend_id(&self) -> &'static str {
        self.backend.id()
    }

    /// Creates a new BucketOperations instance.
    pub fn bucket_operations(&self) -> BucketOperations {
        BucketOperations::new(self.clone())
    }

    /// Creates a new ObjectOperations instance.
    pub fn object_operations(&self) -> ObjectOperations {
        ObjectOperations::new(self.clone())
    }

    /// Returns a reference to the backend.
    #[inline]
    pub(crate) fn as_inner(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("backend", &self.backend.id())
            .finish()
    }
}
