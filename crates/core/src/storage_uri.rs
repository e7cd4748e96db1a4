//! Parsing of `s3://bucket/key` output locations.

use std::fmt;

/// URI scheme every output location must use.
pub const S3_SCHEME: &str = "s3://";

/// Reasons an output location cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum S3UriError {
    #[error("Output location '{0}' does not start with 's3://'")]
    Scheme(String),

    #[error("Output location '{0}' has no bucket")]
    MissingBucket(String),

    #[error("Output location '{0}' has no object key")]
    MissingKey(String),

    /// The location was some JSON value other than a string.
    #[error("Output location {0} is not a string")]
    NotAString(String),
}

/// A bucket + key pair split out of an `s3://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Uri {
    pub bucket: String,
    pub key: String,
}

impl S3Uri {
    /// Split `s3://<bucket>/<key>` into its parts.
    ///
    /// The key keeps any further `/` separators verbatim.
    pub fn parse(uri: &str) -> Result<Self, S3UriError> {
        let rest = uri
            .strip_prefix(S3_SCHEME)
            .ok_or_else(|| S3UriError::Scheme(uri.to_string()))?;

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(S3UriError::MissingBucket(uri.to_string()));
        }
        if key.is_empty() {
            return Err(S3UriError::MissingKey(uri.to_string()));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl fmt::Display for S3Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{S3_SCHEME}{}/{}", self.bucket, self.key)
    }
}
