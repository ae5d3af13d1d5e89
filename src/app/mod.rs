//! Application layer: the feed session and its state machine.
//!
//! This module holds everything that decides *what* happens to a feed, with no
//! knowledge of how pages are fetched or how the list is drawn.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! UI trigger → Event → handle_event → Session mutation → Actions
//!                 ↑                                         │
//!                 └──── PageLoaded ◀── media source ◀── Dispatch
//!                                                           │
//!                                     subscribers ◀──── Notify
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and the single-flight state machine
//! - [`modes`]: Mode controller (trending vs. search)
//! - [`notifier`]: Typed change events and their fan-out
//! - [`state`]: The owned session and its published status
//! - [`store`]: Pagination store and consistent snapshots

pub mod actions;
pub mod handler;
pub mod modes;
pub mod notifier;
pub mod state;
pub mod store;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::ModeController;
pub use notifier::{ChangeEvent, ChangeNotifier, ChangeStream};
pub use state::{FeedStatus, FetchPhase, Session, DEFAULT_PAGE_SIZE};
pub use store::{PaginationStore, Snapshot, StoreReader};
