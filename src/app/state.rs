//! Session state owned by the fetch coordinator.
//!
//! [`Session`] is the single source of truth for one feed: the active mode,
//! the accumulated collection, the loading phase and the generation counter
//! used to recognise stale completions. It outlives any particular UI, so a
//! recreated screen re-attaches to the same session instead of starting over.
//!
//! # State Components
//!
//! - **Modes**: trending vs. search, see [`ModeController`]
//! - **Store**: the collection, see [`PaginationStore`]
//! - **Phase**: `Idle`, or `Loading` with the ticket of the current request
//! - **Generation**: incremented on every dispatch
//! - **Scroll position**: opaque integer kept on behalf of the UI
//!
//! # Example
//!
//! ```rust
//! use mediafeed::app::{FetchPhase, Session};
//! use mediafeed::fetch::FetchKind;
//!
//! let mut session = Session::new(25);
//! assert!(session.needs_initial_load());
//!
//! let (ticket, request) = session.begin_fetch(FetchKind::Refresh);
//! assert_eq!(request.offset, 0);
//! assert_eq!(session.phase(), &FetchPhase::Loading(ticket));
//! ```

use super::modes::ModeController;
use super::store::{PaginationStore, Snapshot, StoreReader};
use crate::domain::Mode;
use crate::fetch::{FetchKind, FetchTicket, PageRequest};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Whether a fetch is outstanding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,

    /// A request is in flight. Only a completion carrying this ticket's
    /// generation is applied.
    Loading(FetchTicket),
}

/// Observable summary of a session, published after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStatus {
    pub mode: Mode,
    pub loading: bool,
    /// The last `request_more` returned an empty page.
    pub exhausted: bool,
    pub item_count: usize,
    pub scroll_position: usize,
    /// Unix timestamp of the last successfully applied page.
    pub last_loaded_at: Option<i64>,
}

/// All state belonging to one feed session.
#[derive(Debug)]
pub struct Session {
    modes: ModeController,
    store: PaginationStore,
    phase: FetchPhase,
    generation: u64,
    page_size: usize,
    exhausted: bool,
    loaded_once: bool,
    scroll_position: usize,
    last_loaded_at: Option<i64>,
}

impl Session {
    /// Creates an idle trending session with an empty collection.
    ///
    /// A `page_size` of zero is replaced by [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            modes: ModeController::default(),
            store: PaginationStore::new(),
            phase: FetchPhase::Idle,
            generation: 0,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            exhausted: false,
            loaded_once: false,
            scroll_position: 0,
            last_loaded_at: None,
        }
    }

    #[must_use]
    pub const fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeController {
        &mut self.modes
    }

    #[must_use]
    pub const fn current_mode(&self) -> &Mode {
        self.modes.current_mode()
    }

    #[must_use]
    pub const fn store(&self) -> &PaginationStore {
        &self.store
    }

    #[must_use]
    pub fn reader(&self) -> StoreReader {
        self.store.reader()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub const fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Loading(_))
    }

    /// Ticket of the request currently in flight, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&FetchTicket> {
        match &self.phase {
            FetchPhase::Idle => None,
            FetchPhase::Loading(ticket) => Some(ticket),
        }
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub const fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    pub fn set_scroll_position(&mut self, position: usize) {
        self.scroll_position = position;
    }

    /// `true` when nothing was ever loaded and nothing is loading: a freshly
    /// created UI should trigger a refresh. A UI recreated over a populated
    /// session only needs to re-attach.
    #[must_use]
    pub fn needs_initial_load(&self) -> bool {
        !self.loaded_once && !self.is_loading() && self.store.is_empty()
    }

    /// Moves to `Loading` with a fresh generation and builds the request.
    ///
    /// Refreshes start at offset 0, appends at the current collection size.
    /// Any previously in-flight ticket stops being current.
    pub fn begin_fetch(&mut self, kind: FetchKind) -> (FetchTicket, PageRequest) {
        self.generation += 1;

        let offset = match kind {
            FetchKind::Refresh => 0,
            FetchKind::More => self.store.len(),
        };
        let mode = self.modes.current_mode().clone();
        let ticket = FetchTicket {
            generation: self.generation,
            kind,
            mode: mode.clone(),
        };
        let request = PageRequest {
            mode,
            offset,
            page_size: self.page_size,
        };

        self.phase = FetchPhase::Loading(ticket.clone());
        (ticket, request)
    }

    /// `true` if `ticket` belongs to the request currently in flight.
    #[must_use]
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.in_flight()
            .is_some_and(|current| current.generation == ticket.generation)
    }

    /// Returns to `Idle`.
    pub fn finish_fetch(&mut self) {
        self.phase = FetchPhase::Idle;
    }

    pub(crate) fn apply_reset(&mut self, items: Vec<crate::domain::MediaItem>) {
        self.store.reset(items);
        self.exhausted = false;
        self.mark_loaded();
    }

    pub(crate) fn apply_append(&mut self, items: Vec<crate::domain::MediaItem>) {
        self.exhausted = items.is_empty();
        self.store.append(items);
        self.mark_loaded();
    }

    fn mark_loaded(&mut self) {
        self.loaded_once = true;
        self.last_loaded_at = Some(chrono::Utc::now().timestamp());
    }

    #[must_use]
    pub fn status(&self) -> FeedStatus {
        FeedStatus {
            mode: self.modes.current_mode().clone(),
            loading: self.is_loading(),
            exhausted: self.exhausted,
            item_count: self.store.len(),
            scroll_position: self.scroll_position,
            last_loaded_at: self.last_loaded_at,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
