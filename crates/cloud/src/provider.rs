use async_trait::async_trait;

use crate::error::StorageError;

/// Read/write access to a bucketed object store.
///
/// Handlers are given this as a trait object so tests can substitute
/// [`InMemoryObjectStore`](crate::InMemoryObjectStore).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full body of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Create or overwrite an object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
