//! Path helpers for locating the data directory and expanding user paths.
//!
//! The data directory holds the rotating log file. It resolves, in order, to
//! `$MEDIAFEED_DATA_DIR`, `$XDG_DATA_HOME/mediafeed`, and
//! `~/.local/share/mediafeed`.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "MEDIAFEED_DATA_DIR";

/// File name used when no log file is configured.
pub const DEFAULT_LOG_FILE: &str = "mediafeed.log";

const APP_DIR: &str = "mediafeed";

/// Returns the data directory for this process's environment.
///
/// Falls back to a relative `mediafeed` directory when neither an override,
/// `XDG_DATA_HOME`, nor `HOME` is set.
///
/// # Examples
///
/// ```
/// use mediafeed::infrastructure::data_dir;
///
/// let dir = data_dir();
/// assert!(dir.ends_with("mediafeed") || std::env::var_os("MEDIAFEED_DATA_DIR").is_some());
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(
        env_path(DATA_DIR_ENV).as_deref(),
        env_path("XDG_DATA_HOME").as_deref(),
        env_path("HOME").as_deref(),
    )
}

/// Resolves the data directory from explicit inputs.
#[must_use]
pub fn resolve_data_dir(
    override_dir: Option<&Path>,
    xdg_data_home: Option<&Path>,
    home: Option<&Path>,
) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(xdg) = xdg_data_home {
        return xdg.join(APP_DIR);
    }
    home.map_or_else(
        || PathBuf::from(APP_DIR),
        |home| home.join(".local").join("share").join(APP_DIR),
    )
}

/// Path of the log file for a configured `log_file` value.
///
/// Relative names are placed inside [`data_dir`]; `~` is expanded.
#[must_use]
pub fn log_file_path(log_file: Option<&str>) -> PathBuf {
    match log_file {
        Some(name) => {
            let expanded = PathBuf::from(expand_tilde(name));
            if expanded.is_absolute() {
                expanded
            } else {
                data_dir().join(expanded)
            }
        }
        None => data_dir().join(DEFAULT_LOG_FILE),
    }
}

/// Expands a leading `~` to the `HOME` directory.
///
/// Paths without a leading tilde, or any path when `HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use mediafeed::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match std::env::var("HOME") {
        Ok(home) => expand_tilde_with(path, &home),
        Err(_) => path.to_string(),
    }
}

fn expand_tilde_with(path: &str, home: &str) -> String {
    if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
