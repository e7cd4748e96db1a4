//! Domain logic for the asynchronous image-generation notification handlers.
//!
//! Everything in this crate is pure: parsing and validating job-status
//! notifications, routing on invocation status, decoding pixel grids into
//! PNG, and deriving the deterministic object keys the handlers write to.
//! Storage I/O lives in `genai-cloud`; the handlers live in `genai-worker`.

pub mod decode;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod notification;
pub mod output;
pub mod storage_uri;
