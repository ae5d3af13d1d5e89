//! Infrastructure layer for filesystem and environment interactions.
//!
//! Currently only path resolution for the data directory and log file.

pub mod paths;

pub use paths::{data_dir, expand_tilde, log_file_path, resolve_data_dir};
