//! Value types returned by storage operations.

mod bucket_info;
mod object_info;
mod outputs;

pub use bucket_info::BucketInfo;
pub use object_info::ObjectInfo;
pub use outputs::{CopyOutput, CreateBucketOutput, DeleteObjectsOutput, UploadOutput};
