//! S3 backend built on the AWS SDK.

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use bytes::Bytes;
use jiff::Timestamp;
use tracing::info;
use url::Url;

use super::s3_config::{DEFAULT_REGION, S3Config, object_location};
use crate::backend::{ObjectReader, StorageBackend};
use crate::types::{
    BucketInfo, CopyOutput, CreateBucketOutput, DeleteObjectsOutput, ObjectInfo, UploadOutput,
};
use crate::{Error, Result, TRACING_TARGET_CLIENT};

/// Backend for AWS S3 and S3-compatible services.
#[derive(Clone)]
pub struct S3Backend {
    inner: Client,
    config: S3Config,
    location_base: Url,
}

impl S3Backend {
    /// Creates a new S3 backend.
    ///
    /// This builds the SDK client but does not contact the service.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: S3Config) -> Result<Self> {
        config.validate()?;
        let location_base = config.resolved_endpoint()?;

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(Credentials::from(config.credentials()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint.as_str());
        }

        let inner = Client::from_conf(builder.build());

        info!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.endpoint_masked(),
            region = %config.region,
            path_style = config.path_style,
            access_key = %config.credentials().access_key_masked(),
            "S3 client initialized"
        );

        Ok(Self {
            inner,
            config,
            location_base,
        })
    }

    /// Returns the configuration this backend was built from.
    #[inline]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Location constraint for bucket creation outside the default region.
    fn bucket_configuration(&self) -> Option<CreateBucketConfiguration> {
        if self.config.endpoint.is_some() || self.config.region == DEFAULT_REGION {
            return None;
        }

        let constraint = BucketLocationConstraint::from(self.config.region.as_str());
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build(),
        )
    }
}

impl std::fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend")
            .field("endpoint", &self.config.endpoint_masked())
            .field("region", &self.config.region)
            .field("path_style", &self.config.path_style)
            .field("access_key", &self.config.credentials().access_key_masked())
            .finish()
    }
}

/// Maps an SDK failure onto [`Error`] by its S3 error code.
fn sdk_error<E>(operation: &'static str, err: SdkError<E>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let message = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_owned(),
        _ => DisplayErrorContext(&err).to_string(),
    };

    match err.code() {
        Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => Error::NotFound(message),
        Some("BucketNotEmpty" | "BucketAlreadyExists" | "BucketAlreadyOwnedByYou") => {
            Error::Conflict(message)
        }
        _ => Error::Service { operation, message },
    }
}

fn timestamp(date: &DateTime) -> Option<Timestamp> {
    Timestamp::from_second(date.secs()).ok()
}

#[async_trait::async_trait]
impl StorageBackend for S3Backend {
    fn id(&self) -> &'static str {
        "s3"
    }

    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketOutput> {
        let output = self
            .inner
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(self.bucket_configuration())
            .send()
            .await
            .map_err(|e| sdk_error("CreateBucket", e))?;

        let location = output
            .location()
            .map_or_else(|| format!("/{bucket}"), str::to_owned);
        Ok(CreateBucketOutput { location })
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let output = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| sdk_error("ListBuckets", e))?;

        let buckets = output
            .buckets()
            .iter()
            .filter_map(|bucket| {
                let info = BucketInfo::new(bucket.name()?);
                Some(match bucket.creation_date().and_then(timestamp) {
                    Some(created) => info.with_creation_date(created),
                    None => info,
                })
            })
            .collect();
        Ok(buckets)
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteBucket", e))?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<UploadOutput> {
        let size = body.len() as u64;
        let output = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| sdk_error("PutObject", e))?;

        Ok(UploadOutput {
            key: key.to_owned(),
            size,
            etag: output.e_tag().map(str::to_owned),
            location: object_location(&self.location_base, self.config.path_style, bucket, key),
        })
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let output = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error("ListObjectsV2", e))?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|object| {
                let size = object.size().unwrap_or(0).max(0) as u64;
                let mut info = ObjectInfo::new(object.key()?, size);
                if let Some(modified) = object.last_modified().and_then(timestamp) {
                    info = info.with_last_modified(modified);
                }
                if let Some(etag) = object.e_tag() {
                    info = info.with_etag(etag);
                }
                Some(info)
            })
            .collect();
        Ok(objects)
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        dest_key: &str,
    ) -> Result<CopyOutput> {
        let copy_source = format!("{bucket}/{}", urlencoding::encode(source_key));
        let output = self
            .inner
            .copy_object()
            .bucket(bucket)
            .copy_source(copy_source)
            .key(dest_key)
            .send()
            .await
            .map_err(|e| sdk_error("CopyObject", e))?;

        Ok(CopyOutput {
            key: dest_key.to_owned(),
            etag: output
                .copy_object_result()
                .and_then(|result| result.e_tag())
                .map(str::to_owned),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteObject", e))?;
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteObjectsOutput> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        let output = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteObjects", e))?;

        let failures: Vec<String> = output
            .errors()
            .iter()
            .map(|failure| {
                format!(
                    "{}: {}",
                    failure.key().unwrap_or("<unknown>"),
                    failure.code().unwrap_or("UnknownError")
                )
            })
            .collect();

        if !failures.is_empty() {
            return Err(Error::Service {
                operation: "DeleteObjects",
                message: failures.join(", "),
            });
        }

        Ok(DeleteObjectsOutput {
            deleted: output
                .deleted()
                .iter()
                .filter_map(|deleted| deleted.key().map(str::to_owned))
                .collect(),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        let output = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_error("GetObject", e))?;

        Ok(Box::pin(output.body.into_async_read()))
    }
}
