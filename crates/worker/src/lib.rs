//! `genai-worker` library crate.
//!
//! The two notification handlers and their supporting pieces:
//!
//! - [`MessageArchiver`] -- stores every job-status message verbatim.
//! - [`ResultExtractor`] -- turns completed jobs into PNG objects plus a
//!   manifest, via [`ImagePersister`].
//!
//! The binary entrypoint lives in `main.rs`.

pub mod archiver;
pub mod command;
pub mod config;
pub mod error;
pub mod extractor;
pub mod persist;
mod received;
pub mod telemetry;

pub use archiver::{ArchiveOutcome, MessageArchiver};
pub use command::Command;
pub use config::{ConfigError, LogFormat, WorkerConfig};
pub use error::HandlerError;
pub use extractor::{ExtractOutcome, ResultExtractor, SkipReason};
pub use persist::{ImagePersister, PersistReport};
