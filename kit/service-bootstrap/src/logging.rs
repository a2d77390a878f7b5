//! Structured logger construction for service processes

use serde::{Deserialize, Serialize};
use tracing::{dispatcher, Dispatch};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

use crate::error::BootstrapResult;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Build a logger handle from the given configuration
///
/// Records are written to stderr. A RUST_LOG filter in the environment takes
/// precedence over the configured level.
pub fn new_logger(config: &LoggingConfig) -> Dispatch {
    // Set up environment filter
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Set up formatting layer based on format
    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed(),
        _ => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(fmt_layer);
    Dispatch::new(subscriber)
}

/// Install a logger as the process-wide default
///
/// Fails when another default has already been installed.
pub fn install_global(logger: &Dispatch) -> BootstrapResult<()> {
    dispatcher::set_global_default(logger.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    #[test]
    fn test_new_logger_builds_for_each_format() {
        for format in ["json", "pretty", "something-else"] {
            let config =
                LoggingConfig { level: "debug".to_string(), format: format.to_string() };
            let _logger = new_logger(&config);
        }
    }

    #[test]
    fn test_config_deserializes() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level":"warn","format":"json"}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, "json");
    }

    #[test]
    fn test_install_global_rejects_second_default() {
        let first = new_logger(&LoggingConfig::default());
        let second = new_logger(&LoggingConfig::default());

        // Exactly one process-wide default can ever be installed
        let _ = install_global(&first);
        assert!(install_global(&second).is_err());
    }
}
