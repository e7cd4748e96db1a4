/// Failures talking to object storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Object s3://{bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("Access denied to s3://{bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    /// Any other remote failure (network, throttling, service error).
    #[error("Storage request failed: {0}")]
    Remote(String),
}
