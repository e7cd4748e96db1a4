//! Tracing subscriber setup for the worker binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, WorkerConfig};

/// Crates whose log level `LOG_LEVEL` controls.
const LOG_TARGETS: &[&str] = &["genai_worker", "genai_cloud", "genai_core"];

/// Default filter directive for `level`, used when `RUST_LOG` is unset.
pub fn default_directive(level: tracing::Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. `RUST_LOG` overrides `LOG_LEVEL`.
pub fn init(config: &WorkerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_all_workspace_crates() {
        assert_eq!(
            default_directive(tracing::Level::WARN),
            "genai_worker=warn,genai_cloud=warn,genai_core=warn"
        );
    }
}
