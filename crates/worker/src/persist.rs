//! Partial-failure-tolerant persistence of decoded images and their manifest.
//!
//! Each image is written independently; a failed write is logged and the
//! batch moves on. The manifest is written last and lists only keys that
//! exist, so it stays the authoritative record even when the batch is
//! incomplete. Manifest write failures are logged and swallowed.

use genai_cloud::{ObjectStore, StorageError};
use genai_core::decode::PNG_CONTENT_TYPE;
use genai_core::error::DecodeError;
use genai_core::manifest::{ImageManifest, JSON_CONTENT_TYPE};
use genai_core::naming;

/// What a persistence run stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    /// Number of images in the output document.
    pub expected: usize,
    /// Keys written in this run, in index order.
    pub saved_keys: Vec<String>,
    /// Keys that could not be decoded or written in this run.
    pub failed_keys: Vec<String>,
    /// Manifest as computed (written or not).
    pub manifest: ImageManifest,
    pub manifest_written: bool,
}

impl PersistReport {
    /// Whether every image was written in this run.
    pub fn is_complete(&self) -> bool {
        self.saved_keys.len() == self.expected
    }
}

/// Writes one job's images and manifest to a bucket.
pub struct ImagePersister<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a str,
}

impl<'a> ImagePersister<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: &'a str) -> Self {
        Self { store, bucket }
    }

    /// Store every successfully decoded image, then the manifest.
    ///
    /// `images` is in document order; its indices determine the keys.
    /// `prompt` is the raw document prompt (used for naming), while
    /// `manifest_prompt` is what the manifest records.
    pub async fn persist(
        &self,
        inference_id: &str,
        prompt: Option<&str>,
        manifest_prompt: &str,
        images: Vec<Result<Vec<u8>, DecodeError>>,
    ) -> PersistReport {
        let expected_keys = naming::image_keys(inference_id, prompt, images.len());
        let mut saved_keys = Vec::with_capacity(images.len());
        let mut failed_keys = Vec::new();

        for (index, (key, image)) in expected_keys.iter().zip(images).enumerate() {
            let png = match image {
                Ok(png) => png,
                Err(e) => {
                    tracing::warn!(inference_id, index, error = %e, "Unable to decode image, skipping");
                    failed_keys.push(key.clone());
                    continue;
                }
            };

            tracing::info!(inference_id, index, key = %key, "Saving image");
            match self
                .store
                .put_object(self.bucket, key, png, PNG_CONTENT_TYPE)
                .await
            {
                Ok(()) => saved_keys.push(key.clone()),
                Err(e) => {
                    tracing::warn!(inference_id, key = %key, error = %e, "Failed to save image");
                    failed_keys.push(key.clone());
                }
            }
        }

        let expected = expected_keys.len();
        if saved_keys.len() == expected {
            tracing::info!(inference_id, saved = saved_keys.len(), expected, "All images saved successfully");
        } else {
            tracing::warn!(
                inference_id,
                saved = saved_keys.len(),
                expected,
                "Unable to save all images, only {}/{} succeeded",
                saved_keys.len(),
                expected,
            );
        }

        // A retry only needs the previous manifest when this run lost keys.
        let previous = if failed_keys.is_empty() {
            None
        } else {
            self.previous_manifest(inference_id).await
        };

        let manifest = ImageManifest::new(inference_id, manifest_prompt, saved_keys.clone())
            .preserving(previous.as_ref(), &expected_keys);
        let manifest_written = self.write_manifest(&manifest).await;

        PersistReport {
            expected,
            saved_keys,
            failed_keys,
            manifest,
            manifest_written,
        }
    }

    /// Manifest left by an earlier delivery of the same notification, if any.
    async fn previous_manifest(&self, inference_id: &str) -> Option<ImageManifest> {
        let key = naming::manifest_key(inference_id);
        match self.store.get_object(self.bucket, &key).await {
            Ok(bytes) => match ImageManifest::from_slice(&bytes) {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Ignoring unreadable previous manifest");
                    None
                }
            },
            Err(StorageError::NotFound { .. }) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unable to read previous manifest");
                None
            }
        }
    }

    async fn write_manifest(&self, manifest: &ImageManifest) -> bool {
        let key = naming::manifest_key(&manifest.image_id);

        let body = match manifest.to_json_bytes() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unable to serialize image manifest");
                return false;
            }
        };

        match self
            .store
            .put_object(self.bucket, &key, body, JSON_CONTENT_TYPE)
            .await
        {
            Ok(()) => {
                tracing::info!(key = %key, images = manifest.image_keys.len(), "Saved image manifest");
                true
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unable to save image manifest");
                false
            }
        }
    }
}
