//! Amazon S3 storage provider.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;

use crate::error::StorageError;
use crate::provider::ObjectStore;

/// S3 error codes treated as a missing object.
const NOT_FOUND_CODES: &[&str] = &["NoSuchKey", "NoSuchBucket", "NotFound"];

/// S3 error codes treated as a permissions problem.
const ACCESS_DENIED_CODES: &[&str] = &["AccessDenied", "Forbidden"];

/// [`ObjectStore`] backed by an `aws_sdk_s3::Client`.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (environment,
    /// profile, or the execution role's credentials).
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        tracing::debug!(region = ?config.region(), "Loaded AWS configuration");
        Self::new(aws_sdk_s3::Client::new(&config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, bucket, key))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Remote(format!("reading s3://{bucket}/{key}: {e}")))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| classify(e, bucket, key))?;
        Ok(())
    }
}

/// Map an SDK error onto [`StorageError`] by its S3 error code.
fn classify<E, R>(err: SdkError<E, R>, bucket: &str, key: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some(code) if NOT_FOUND_CODES.contains(&code) => StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        Some(code) if ACCESS_DENIED_CODES.contains(&code) => StorageError::AccessDenied {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        _ => StorageError::Remote(DisplayErrorContext(&err).to_string()),
    }
}
