//! The job output document written by the inference endpoint.
//!
//! ```json
//! {
//!     "generated_images": [
//!         [
//!             [[208, 165, 83], [226, 176, 72], ...],
//!             ...
//!         ]
//!     ],
//!     "prompt": "astronaut on a horse"
//! }
//! ```

use serde::{Deserialize, Deserializer};

use crate::decode::{self, PixelGrid};
use crate::error::DecodeError;

/// Prompt recorded in the manifest when the document has none.
pub const DEFAULT_PROMPT: &str = "image";

/// Output document fetched from a completed job's output location.
///
/// `generated_images` stays untyped until [`JobOutput::image_grids`] so a
/// malformed entry only spoils that entry, not the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobOutput {
    #[serde(default)]
    pub generated_images: Option<serde_json::Value>,
    /// Only used for naming, so a non-string prompt counts as absent.
    #[serde(default, deserialize_with = "string_or_absent")]
    pub prompt: Option<String>,
}

fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(prompt)) => Ok(Some(prompt)),
        _ => Ok(None),
    }
}

impl JobOutput {
    /// Parse an output document. Empty bodies are rejected like invalid JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Prompt as recorded in the manifest.
    pub fn prompt_or_default(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    /// Split `generated_images` into per-image grids, preserving order.
    ///
    /// Returns `None` when the field is absent, not a sequence, or empty.
    pub fn image_grids(&self) -> Option<Vec<Result<PixelGrid, DecodeError>>> {
        let entries = self.generated_images.as_ref()?.as_array()?;
        if entries.is_empty() {
            return None;
        }
        Some(entries.iter().map(decode::grid_from_value).collect())
    }
}
