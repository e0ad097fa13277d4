//! Tracing setup.
//!
//! Logs always go to stderr: with the stdio transport stdout carries the
//! protocol stream and must stay clean.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::defaults::LOG_FILE_NAME;

/// Maps Python-style level names (`WARNING`, `CRITICAL`) onto tracing
/// directives; anything else is passed through lowercased.
pub fn level_directive(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        "" => "info".to_string(),
        other => other.to_string(),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured
/// level. Returns the log file path when file logging is enabled.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>, Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&config.log_level)));

    let (file_layer, log_path) = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(LOG_FILE_NAME);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::level_directive;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("critical"), "error");
        assert_eq!(level_directive(""), "info");
        assert_eq!(level_directive("freqtrade_mcp=debug"), "freqtrade_mcp=debug");
    }
}
