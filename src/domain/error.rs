//! Error types for the media feed core.
//!
//! This module defines the centralized error type [`FeedError`] and a type alias
//! [`Result`] used throughout the crate. Only [`FeedError::FetchFailed`] ever
//! reaches the pagination state machine; it is absorbed there and turned into a
//! `Failed` change event. The remaining variants belong to the ambient layers
//! (configuration, I/O, session handles).

use thiserror::Error;

/// The main error type for media feed operations.
///
/// # Examples
///
/// ```
/// use mediafeed::FeedError;
///
/// fn fetch() -> Result<(), FeedError> {
///     Err(FeedError::FetchFailed("connection reset".to_string()))
/// }
///
/// assert!(fetch().unwrap_err().is_fetch_failure());
/// ```
#[derive(Debug, Error)]
pub enum FeedError {
    /// A page could not be produced by the media source.
    ///
    /// Covers transport errors, malformed responses and responses that carry
    /// no usable items. The string is diagnostic only; the state machine does
    /// not distinguish between causes.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The coordinator behind a session handle has stopped running.
    #[error("Session closed")]
    SessionClosed,
}

impl FeedError {
    /// Returns `true` for errors produced by the media source.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }
}

/// A specialized `Result` type for media feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
