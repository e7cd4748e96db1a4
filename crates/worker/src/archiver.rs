//! Message Archiver: stores every job-status message verbatim.
//!
//! Success and failure notifications alike end up at
//! `messages/{inferenceId}.json`, byte-for-byte as delivered, for audit and
//! debugging. Untracked messages (no `inferenceId`) are ignored.

use std::sync::Arc;

use genai_cloud::ObjectStore;
use genai_core::manifest::JSON_CONTENT_TYPE;
use genai_core::naming;
use genai_core::notification::{self, Notification};

use crate::error::HandlerError;
use crate::received;

const HANDLER: &str = "archive";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Not about any inference job.
    Ignored,
    Archived { key: String },
}

/// Handler for job success and error notifications.
pub struct MessageArchiver {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl MessageArchiver {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Validate raw event bytes and archive the message they carry.
    pub async fn handle_event(&self, event: &[u8]) -> Result<ArchiveOutcome, HandlerError> {
        let notification = notification::parse_event(event)?;
        self.handle(notification).await
    }

    /// Archive an already validated notification.
    ///
    /// A failed write is returned as an error so the runtime re-delivers the
    /// event; the key is deterministic, so the retry overwrites in place.
    pub async fn handle(&self, notification: Notification) -> Result<ArchiveOutcome, HandlerError> {
        let job = match notification {
            Notification::Untracked { delivery, raw_body } => {
                received::log_untracked(HANDLER, &delivery, &raw_body);
                return Ok(ArchiveOutcome::Ignored);
            }
            Notification::Inference(job) => job,
        };
        received::log_inference(HANDLER, &job);

        let key = naming::message_key(&job.inference_id);
        tracing::info!(
            inference_id = %job.inference_id,
            "Writing message to s3://{}/{}",
            self.bucket,
            key,
        );

        self.store
            .put_object(&self.bucket, &key, job.raw_body.into_bytes(), JSON_CONTENT_TYPE)
            .await
            .map_err(|source| HandlerError::Archive {
                key: key.clone(),
                source,
            })?;

        Ok(ArchiveOutcome::Archived { key })
    }
}
