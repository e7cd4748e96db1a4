//! Handler selection for the `genai-worker` binary.

use std::fmt;
use std::str::FromStr;

/// Which handler a process invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Archive the raw notification body.
    Archive,
    /// Extract images from a completed job.
    Extract,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "archive" | "save-message" => Ok(Self::Archive),
            "extract" | "extract-image" => Ok(Self::Extract),
            other => Err(format!(
                "Unknown command '{other}'. Must be one of: archive, extract"
            )),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => f.write_str("archive"),
            Self::Extract => f.write_str("extract"),
        }
    }
}
