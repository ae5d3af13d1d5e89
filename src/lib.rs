//! Mediafeed: client-side synchronization core for paged media feeds.
//!
//! Mediafeed keeps a locally held, growing collection of media records in
//! sync with a remote paged source and tells a list UI exactly how the
//! collection changed:
//! - Two browsing modes, trending and keyword search
//! - Single-flight page loading with generation-tagged requests
//! - Copy-on-write collection with consistent snapshots
//! - Typed change events (`Reset`, `Appended`, `Failed`) for incremental UI updates
//! - A session that outlives UI recreation

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host UI (list widget, input)                       │  ← Embeds the crate
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  UI Layer (ui/)                                     │  ← ListModel
//! │  - Mirrored list, near-end trigger, error flag      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Fetch Layer (fetch/)                               │  ← Async runtime
//! │  - FetchCoordinator task / SessionHandle            │
//! │  - MediaFetchPort boundary, Giphy adapter           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, action dispatching               │
//! │  - Modes, pagination store, change notifier         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory paths (infrastructure/)           │
//! │  - Errors, media items, modes (domain/)             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - Rotating file log                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`domain`]: Core domain types (media items, modes, errors)
//! - [`fetch`]: Fetch coordinator, session handles and the media source port
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`ui`]: List view model
//! - [`observability`]: Tracing subscriber with a rotating log file
//!
//! # Configuration
//!
//! Configuration comes from a TOML file or a plain string map:
//!
//! ```toml
//! page_size = 25
//! load_trigger_threshold = 2
//! api_key = "..."
//! rating = "g"
//! trace_level = "debug"
//! ```
//!
//! # Examples
//!
//! ## Pure state machine
//!
//! ```rust
//! use mediafeed::{handle_event, Action, Event, Session};
//!
//! let mut session = Session::new(25);
//! let actions = handle_event(&mut session, Event::RequestRefresh);
//! assert!(matches!(actions.as_slice(), [Action::Dispatch { .. }]));
//!
//! // A second refresh while loading is coalesced.
//! assert!(handle_event(&mut session, Event::RequestRefresh).is_empty());
//! ```
//!
//! ## Running a session
//!
//! ```rust
//! use futures_util::future::{BoxFuture, FutureExt};
//! use mediafeed::fetch::{MediaFetchPort, PageRequest, PageResult};
//! use mediafeed::{ChangeEvent, Config, FetchCoordinator, MediaItem};
//!
//! struct OnePage;
//!
//! impl MediaFetchPort for OnePage {
//!     fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, PageResult> {
//!         let item = MediaItem::new(format!("m{}", request.offset), "https://m/x.gif", 1, 1);
//!         async move { Ok(vec![item]) }.boxed()
//!     }
//! }
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! runtime.block_on(async {
//!     let (coordinator, handle) = FetchCoordinator::new(&Config::default(), OnePage);
//!     let session = tokio::spawn(coordinator.run());
//!
//!     let mut changes = handle.subscribe();
//!     handle.request_refresh()?;
//!     assert_eq!(changes.recv().await, Some(ChangeEvent::Reset));
//!     assert_eq!(handle.len(), 1);
//!
//!     drop(handle);
//!     let _ = session.await;
//!     Ok::<(), mediafeed::FeedError>(())
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Single Owner
//!
//! The session is owned by one coordinator task. UI triggers and page
//! completions reach it through the same queue, so transitions are applied
//! one at a time and change events come out in mutation order.
//!
//! ## Generation Tags
//!
//! Every dispatched request carries the generation it was issued under. A
//! completion that is no longer current (mode switched, refresh superseded)
//! is discarded without touching the collection or emitting an event.
//!
//! ## Snapshots
//!
//! Readers get an `Arc` of the whole collection. A page is applied by swapping
//! in a new version, so a snapshot never shows half of a page.

pub mod app;
pub mod domain;
pub mod fetch;
pub mod infrastructure;
pub mod observability;
pub mod ui;

pub use app::{
    handle_event, Action, ChangeEvent, ChangeStream, Event, FeedStatus, Session, Snapshot,
    DEFAULT_PAGE_SIZE,
};
pub use domain::{FeedError, MediaItem, Mode, Result};
pub use fetch::{FetchCoordinator, MediaFetchPort, SessionHandle};
pub use ui::{ListModel, ListUpdate, DEFAULT_LOAD_TRIGGER_THRESHOLD};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Content rating sent to the media source when none is configured.
pub const DEFAULT_RATING: &str = "g";

/// Feed configuration.
///
/// Every field has a default, so an empty TOML document or an empty map is a
/// valid configuration.
///
/// # Example
///
/// ```toml
/// page_size = 50
/// api_key = "dc6zaTOxFJmzC"
/// rating = "pg"
/// trace_level = "debug"
/// log_file = "~/logs/mediafeed.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Items requested per page. `0` is treated as the default of 25.
    pub page_size: usize,

    /// How close to the end of the list (in rows) the UI asks for more.
    /// Default: 2
    pub load_trigger_threshold: usize,

    /// API key for the media source. Required by the Giphy adapter.
    pub api_key: Option<String>,

    /// Content rating filter. Default: `"g"`
    pub rating: String,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file path. Relative paths are placed in the data directory.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            load_trigger_threshold: DEFAULT_LOAD_TRIGGER_THRESHOLD,
            api_key: None,
            rating: DEFAULT_RATING.to_string(),
            trace_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, such as host-provided
    /// key/value settings.
    ///
    /// # Parsing Rules
    ///
    /// - `page_size`: String → `usize` (falls back to 25 on parse error or `0`)
    /// - `load_trigger_threshold`: String → `usize` (falls back to 2)
    /// - `api_key`, `trace_level`, `log_file`: String → `Option<String>` (blank is `None`)
    /// - `rating`: String (falls back to `"g"` when blank)
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use mediafeed::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "50".to_string());
    /// map.insert("api_key".to_string(), "key".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 50);
    /// assert_eq!(config.api_key.as_deref(), Some("key"));
    /// assert_eq!(config.rating, "g");
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let page_size = config
            .get("page_size")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let load_trigger_threshold = config
            .get("load_trigger_threshold")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LOAD_TRIGGER_THRESHOLD);

        Self {
            page_size,
            load_trigger_threshold,
            api_key: text("api_key"),
            rating: text("rating").unwrap_or_else(|| DEFAULT_RATING.to_string()),
            trace_level: text("trace_level"),
            log_file: text("log_file"),
        }
        .normalized()
    }

    /// Parses configuration from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the document is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| FeedError::Config(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] if the file cannot be read and
    /// [`FeedError::Config`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&source)
    }

    fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.rating.trim().is_empty() {
            self.rating = DEFAULT_RATING.to_string();
        }
        self
    }
}

/// Initializes logging and creates a trending session around `port`.
///
/// Returns the coordinator, which the caller spawns on its runtime, and the
/// first [`SessionHandle`]. The session starts empty; call
/// [`SessionHandle::request_refresh`] to load the first page. List UIs build
/// their view model with [`ListModel::from_config`] from the same config.
///
/// # Side Effects
///
/// - Installs the global tracing subscriber (see [`observability::init_tracing`])
/// - Creates the log directory if it doesn't exist
pub fn initialize<P: MediaFetchPort>(config: &Config, port: P) -> (FetchCoordinator<P>, SessionHandle) {
    observability::init_tracing(config);
    tracing::debug!(page_size = config.page_size, "initializing media feed session");

    FetchCoordinator::new(config, port)
}
