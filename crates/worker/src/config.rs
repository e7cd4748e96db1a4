use std::str::FromStr;

use tracing::Level;

/// Startup configuration problems. Any of these aborts the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': expected one of {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Handler configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Destination bucket for archived messages, images and manifests.
    pub bucket_name: String,
    /// Default log verbosity when `RUST_LOG` is unset.
    pub log_level: Level,
    pub log_format: LogFormat,
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var       | Default  |
    /// |---------------|----------|
    /// | `BUCKET_NAME` | required |
    /// | `LOG_LEVEL`   | `INFO`   |
    /// | `LOG_FORMAT`  | `text`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_name = lookup("BUCKET_NAME")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("BUCKET_NAME"))?;

        let log_level = match lookup("LOG_LEVEL") {
            None => Level::INFO,
            Some(raw) => Level::from_str(raw.trim()).map_err(|_| ConfigError::Invalid {
                var: "LOG_LEVEL",
                value: raw,
                expected: "TRACE, DEBUG, INFO, WARN, ERROR",
            })?,
        };

        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "LOG_FORMAT",
                value: raw,
                expected: "text, json",
            })?,
        };

        Ok(Self {
            bucket_name,
            log_level,
            log_format,
        })
    }
}
