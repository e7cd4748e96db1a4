use genai_cloud::StorageError;
use genai_core::error::NotificationError;

/// Errors that fail a handler invocation.
///
/// Everything else (untracked messages, non-completed jobs, missing output,
/// individual image write failures) is logged and reported through the
/// handler's outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The inbound event is malformed; the trigger is wired incorrectly.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// The raw message could not be archived.
    #[error("Failed to archive message to {key}: {source}")]
    Archive {
        key: String,
        #[source]
        source: StorageError,
    },
}
