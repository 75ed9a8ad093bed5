//! Tracing subscriber setup.

use quip_core::config::LoggingConfig;
use quip_core::error::{QuipError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::paths::QuipPaths;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "QUIP_LOG";

/// Builds the filter: `QUIP_LOG` when set, otherwise the configured level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| QuipError::config(format!("Invalid log filter '{}': {}", config.level, e)))
}

/// Installs the global tracing subscriber.
///
/// Logs go to stderr, and additionally to `logs/quip.log.YYYY-MM-DD` when
/// `config.file` is set. The returned guard must be kept alive for the file
/// writer to flush.
pub fn init_tracing(config: &LoggingConfig, paths: &QuipPaths) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(config)?;

    let (file_layer, guard) = if config.file {
        let appender = tracing_appender::rolling::daily(paths.logs_dir()?, "quip.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| QuipError::config(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::debug!(level = %config.level, file = config.file, "tracing initialised");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        let config = LoggingConfig {
            level: "quip_application=debug,warn".to_string(),
            file: false,
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_second_init_reports_error() {
        let paths = QuipPaths::default();
        let config = LoggingConfig::default();

        let _ = init_tracing(&config, &paths);
        let err = init_tracing(&config, &paths).unwrap_err();
        assert!(matches!(err, QuipError::Config(_)));
    }
}
