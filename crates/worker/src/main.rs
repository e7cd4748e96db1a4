//! `genai-worker` -- runs one notification handler over one event.
//!
//! ```text
//! genai-worker <archive|extract> [EVENT_FILE]
//! ```
//!
//! The event JSON is read from `EVENT_FILE`, or from stdin when omitted or
//! `-`. The process exits non-zero only for fatal conditions: bad
//! configuration, a malformed event, or a failed archive write.
//!
//! # Environment variables
//!
//! | Variable      | Required | Default | Description                          |
//! |---------------|----------|---------|--------------------------------------|
//! | `BUCKET_NAME` | yes      | --      | Destination bucket for all writes    |
//! | `LOG_LEVEL`   | no       | `INFO`  | Log verbosity (`RUST_LOG` overrides) |
//! | `LOG_FORMAT`  | no       | `text`  | `text` or `json`                     |

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::AsyncReadExt;

use genai_cloud::{ObjectStore, S3ObjectStore};
use genai_worker::{telemetry, Command, MessageArchiver, ResultExtractor, WorkerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("genai-worker: {e}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(&config);

    let mut args = std::env::args().skip(1);
    let command: Command = match args.next().as_deref().map(str::parse) {
        Some(Ok(command)) => command,
        Some(Err(e)) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
        None => {
            tracing::error!("Usage: genai-worker <archive|extract> [EVENT_FILE]");
            return ExitCode::FAILURE;
        }
    };

    let event = match read_event(args.next()).await {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read event");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        command = %command,
        event = %String::from_utf8_lossy(&event),
        "Received event"
    );

    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_env().await);
    tracing::info!(command = %command, bucket = %config.bucket_name, "Starting genai-worker");

    let result = match command {
        Command::Archive => MessageArchiver::new(store, config.bucket_name)
            .handle_event(&event)
            .await
            .map(|outcome| tracing::info!(?outcome, "Archiver finished")),
        Command::Extract => ResultExtractor::new(store, config.bucket_name)
            .handle_event(&event)
            .await
            .map(|outcome| tracing::info!(?outcome, "Extractor finished")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Invocation failed");
            ExitCode::FAILURE
        }
    }
}

/// Read the event from a file path, or stdin for `None` / `-`.
async fn read_event(path: Option<String>) -> std::io::Result<Vec<u8>> {
    match path.as_deref() {
        None | Some("-") => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        }
        Some(path) => tokio::fs::read(path).await,
    }
}
