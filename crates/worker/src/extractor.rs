//! Result Extractor: completed job notification → PNG objects + manifest.
//!
//! Flow for one notification:
//!
//! 1. validate the envelope (malformed ⇒ [`HandlerError`]);
//! 2. ignore untracked and non-completed notifications;
//! 3. fetch and parse the output document from `outputLocation`;
//! 4. decode each `generated_images` entry to PNG;
//! 5. hand the batch to [`ImagePersister`].
//!
//! Steps 2–4 never fail the invocation: every early exit is an info-level
//! log line and a [`SkipReason`].

use std::sync::Arc;

use genai_cloud::{ObjectStore, StorageError};
use genai_core::decode;
use genai_core::notification::{self, InvocationStatus, Notification, Route};
use genai_core::output::JobOutput;
use genai_core::storage_uri::{S3Uri, S3UriError};

use crate::error::HandlerError;
use crate::persist::{ImagePersister, PersistReport};
use crate::received;

const HANDLER: &str = "extract";

/// Why a notification produced no images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No `inferenceId`; not about any job.
    Untracked,
    NotCompleted(InvocationStatus),
    MissingOutputLocation,
    InvalidOutputLocation(S3UriError),
    OutputUnavailable(StorageError),
    EmptyOutput,
    UnparseableOutput(String),
    /// `generated_images` absent, not a sequence, or empty.
    NoImages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Skipped(SkipReason),
    Extracted(PersistReport),
}

/// Handler for job success notifications.
pub struct ResultExtractor {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ResultExtractor {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Validate raw event bytes and process them.
    pub async fn handle_event(&self, event: &[u8]) -> Result<ExtractOutcome, HandlerError> {
        let notification = notification::parse_event(event)?;
        Ok(self.handle(notification).await)
    }

    /// Process an already validated notification.
    pub async fn handle(&self, notification: Notification) -> ExtractOutcome {
        let job = match notification {
            Notification::Untracked { delivery, raw_body } => {
                received::log_untracked(HANDLER, &delivery, &raw_body);
                return ExtractOutcome::Skipped(SkipReason::Untracked);
            }
            Notification::Inference(job) => job,
        };
        received::log_inference(HANDLER, &job);
        let inference_id = job.inference_id.as_str();

        let uri = match job.route() {
            Route::Extract(uri) => uri,
            Route::NotCompleted => {
                tracing::info!(inference_id, status = %job.status, "Invocation status is not completed, ignoring");
                return ExtractOutcome::Skipped(SkipReason::NotCompleted(job.status.clone()));
            }
            Route::MissingOutputLocation => {
                tracing::info!(inference_id, "No output location in message, ignoring");
                return ExtractOutcome::Skipped(SkipReason::MissingOutputLocation);
            }
            Route::InvalidOutputLocation(e) => {
                tracing::info!(inference_id, error = %e, "Invalid output location, ignoring");
                return ExtractOutcome::Skipped(SkipReason::InvalidOutputLocation(e));
            }
        };

        tracing::info!(inference_id, output_location = %uri, "Loading raw image data");
        let output = match self.fetch_output(&uri).await {
            Ok(output) => output,
            Err(reason) => {
                tracing::info!(inference_id, reason = ?reason, "Unable to load output data");
                return ExtractOutcome::Skipped(reason);
            }
        };

        let Some(grids) = output.image_grids() else {
            tracing::info!(inference_id, "Invalid image data, unable to decode");
            return ExtractOutcome::Skipped(SkipReason::NoImages);
        };

        let images = grids
            .into_iter()
            .map(|grid| grid.and_then(|g| decode::encode_png(&g)))
            .collect();

        let report = ImagePersister::new(self.store.as_ref(), &self.bucket)
            .persist(
                inference_id,
                output.prompt.as_deref(),
                output.prompt_or_default(),
                images,
            )
            .await;

        ExtractOutcome::Extracted(report)
    }

    async fn fetch_output(&self, uri: &S3Uri) -> Result<JobOutput, SkipReason> {
        let body = self
            .store
            .get_object(&uri.bucket, &uri.key)
            .await
            .map_err(SkipReason::OutputUnavailable)?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SkipReason::EmptyOutput);
        }

        JobOutput::from_slice(&body).map_err(|e| SkipReason::UnparseableOutput(e.to_string()))
    }
}
