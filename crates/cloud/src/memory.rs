//! In-memory [`ObjectStore`] with failure injection.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::provider::ObjectStore;

/// An object as written through [`ObjectStore::put_object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

type ObjectKey = (String, String);

/// Process-local object store keyed by `(bucket, key)`.
///
/// Keys registered with [`fail_puts_for`](Self::fail_puts_for) or
/// [`deny_gets_for`](Self::deny_gets_for) fail on access, which lets
/// tests exercise partial-failure paths.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<ObjectKey, StoredObject>>>,
    failing_puts: Arc<RwLock<HashSet<String>>>,
    denied_gets: Arc<RwLock<HashSet<String>>>,
    put_attempts: Arc<RwLock<Vec<String>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a put attempt.
    pub async fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: None,
            },
        );
    }

    /// Make every future put to `key` fail with [`StorageError::Remote`].
    pub async fn fail_puts_for(&self, key: &str) {
        self.failing_puts.write().await.insert(key.to_string());
    }

    /// Make every future get of `key` fail with [`StorageError::AccessDenied`].
    pub async fn deny_gets_for(&self, key: &str) {
        self.denied_gets.write().await.insert(key.to_string());
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys stored in `bucket`, sorted.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Every key a put was attempted for, in order, including failed ones.
    pub async fn put_attempts(&self) -> Vec<String> {
        self.put_attempts.read().await.clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        if self.denied_gets.read().await.contains(key) {
            return Err(StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        self.object(bucket, key)
            .await
            .map(|o| o.body)
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.put_attempts.write().await.push(key.to_string());

        if self.failing_puts.read().await.contains(key) {
            return Err(StorageError::Remote(format!(
                "injected failure writing s3://{bucket}/{key}"
            )));
        }

        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }
}
