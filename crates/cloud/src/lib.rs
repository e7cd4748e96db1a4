//! Object storage for the notification handlers.
//!
//! - [`ObjectStore`] -- the capability the handlers are given.
//! - [`S3ObjectStore`] -- Amazon S3 implementation used in production.
//! - [`InMemoryObjectStore`] -- process-local implementation with failure
//!   injection, used by tests and local event replays.

pub mod error;
pub mod memory;
pub mod provider;
pub mod s3;

pub use error::StorageError;
pub use memory::{InMemoryObjectStore, StoredObject};
pub use provider::ObjectStore;
pub use s3::S3ObjectStore;
