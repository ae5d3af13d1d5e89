//! Tracing initialization and subscriber setup.
//!
//! Wires `tracing` macros to a plain-text fmt layer writing into the rotating
//! log file under the data directory.

use super::file_writer::FileWriter;
use crate::Config;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Initializes the global tracing subscriber.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. [`DEFAULT_TRACE_LEVEL`]
///
/// # File Location
///
/// `config.log_file` if set (relative names go into the data directory),
/// otherwise `mediafeed.log` in [`crate::infrastructure::data_dir`].
///
/// # Initialization Behavior
///
/// Best-effort. Does nothing if the log directory cannot be created, and
/// only the first call in a process installs a subscriber.
///
/// # Example
///
/// ```rust
/// use mediafeed::observability::init_tracing;
/// use mediafeed::Config;
///
/// let dir = tempfile::tempdir()?;
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     log_file: Some(dir.path().join("feed.log").display().to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn init_tracing(config: &Config) {
    let log_path = crate::infrastructure::log_file_path(config.log_file.as_deref());
    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(resolve_level(config)));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(FileWriter::new(log_path)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}

fn resolve_level(config: &Config) -> String {
    config
        .trace_level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_TRACE_LEVEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_falls_back_to_info() {
        assert_eq!(resolve_level(&Config::default()), "info");

        let blank = Config {
            trace_level: Some("  ".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_level(&blank), "info");
    }

    #[test]
    fn configured_level_used() {
        let config = Config {
            trace_level: Some("mediafeed=trace".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_level(&config), "mediafeed=trace");
    }
}
