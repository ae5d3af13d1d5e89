//! Logging to a size-rotating file.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → mediafeed.log
//! ```
//!
//! # Features
//!
//! - **File Output**: `~/.local/share/mediafeed/mediafeed.log` by default
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::{FileWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::{init_tracing, DEFAULT_TRACE_LEVEL};
