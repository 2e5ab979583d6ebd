//! `tracing-subscriber` installation.

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global fmt subscriber configured by `config`.
///
/// `RUST_LOG` takes precedence over `config.level` when set. Returns an
/// error rather than panicking if a global subscriber is already installed,
/// so tests and embedding applications can call it freely.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        let config = LogConfig::default();
        let first = init_logging(&config);
        let second = init_logging(&config);

        // Whichever test installed the subscriber first, the second call must fail cleanly.
        assert!(first.is_err() || second.is_err());
    }
}
