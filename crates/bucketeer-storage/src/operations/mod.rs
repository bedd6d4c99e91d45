//! Instrumented bucket and object operations.
//!
//! Every operation validates its arguments, issues exactly one backend
//! request, and logs the outcome with the elapsed time before returning it.

mod bucket_operations;
mod object_operations;

pub use bucket_operations::BucketOperations;
pub use object_operations::ObjectOperations;

use crate::{Error, Result};

/// Rejects empty bucket names and keys before a request is sent.
fn ensure_named(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidRequest(format!("{kind} cannot be empty")));
    }
    Ok(())
}
