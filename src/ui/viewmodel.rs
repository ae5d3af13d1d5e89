//! List view model mirroring the session collection.
//!
//! A [`ListModel`] is what a list widget binds to. It consumes the session's
//! change events and tells the widget the minimal update to perform, the same
//! way an adapter is told "data set changed" or "range inserted". It also owns
//! the infinite-scroll trigger and the transient error indicator.
//!
//! # Example
//!
//! ```rust
//! use mediafeed::app::{ChangeEvent, FeedStatus, PaginationStore};
//! use mediafeed::ui::{ListModel, ListUpdate};
//! use mediafeed::MediaItem;
//!
//! let mut store = PaginationStore::new();
//! store.reset(vec![MediaItem::new("a", "https://m/a.gif", 1, 1)]);
//!
//! let mut list = ListModel::new(2);
//! let update = list.apply(ChangeEvent::Reset, &store.snapshot());
//! assert_eq!(update, ListUpdate::Redraw);
//! assert!(list.should_request_more(0, &FeedStatus::default()));
//! ```

use crate::app::{ChangeEvent, FeedStatus, Snapshot};
use crate::domain::MediaItem;
use crate::Config;

/// Items from the end of the list at which more data is requested.
pub const DEFAULT_LOAD_TRIGGER_THRESHOLD: usize = 2;

/// Instruction for the list widget after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
    /// Redraw everything.
    Redraw,

    /// `count` rows were inserted starting at row `start`.
    Inserted {
        start: usize,
        count: usize,
    },

    /// Show a transient error; rows are unchanged.
    ShowError,
}

/// Displayed copy of the collection plus list affordances.
#[derive(Debug, Clone)]
pub struct ListModel {
    items: Vec<MediaItem>,
    error_visible: bool,
    trigger_threshold: usize,
}

impl ListModel {
    #[must_use]
    pub const fn new(trigger_threshold: usize) -> Self {
        Self {
            items: Vec::new(),
            error_visible: false,
            trigger_threshold,
        }
    }

    /// An empty model using the configured `load_trigger_threshold`.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.load_trigger_threshold)
    }

    /// A model for a recreated UI, populated from the session's current
    /// collection without waiting for an event.
    #[must_use]
    pub fn attach(trigger_threshold: usize, snapshot: &Snapshot) -> Self {
        Self {
            items: snapshot.to_vec(),
            error_visible: false,
            trigger_threshold,
        }
    }

    /// Applies one change event, reading new rows from `snapshot`.
    ///
    /// If `snapshot` does not line up with the rows already shown (the
    /// session moved on before this event was consumed), the whole list is
    /// redrawn from the snapshot instead of inserting. Lining up means the
    /// lengths add up and the last shown row is the same item.
    pub fn apply(&mut self, event: ChangeEvent, snapshot: &Snapshot) -> ListUpdate {
        match event {
            ChangeEvent::Reset => {
                self.error_visible = false;
                self.items = snapshot.to_vec();
                ListUpdate::Redraw
            }
            ChangeEvent::Appended { count } => {
                self.error_visible = false;
                let start = self.items.len();

                if !self.continues_into(snapshot, count) {
                    tracing::debug!(
                        shown = start,
                        count,
                        snapshot = snapshot.len(),
                        "list out of step with snapshot, redrawing"
                    );
                    self.items = snapshot.to_vec();
                    return ListUpdate::Redraw;
                }

                self.items.extend_from_slice(snapshot.tail(count));
                ListUpdate::Inserted { start, count }
            }
            ChangeEvent::Failed => {
                self.error_visible = true;
                ListUpdate::ShowError
            }
        }
    }

    fn continues_into(&self, snapshot: &Snapshot, count: usize) -> bool {
        if self.items.len().checked_add(count) != Some(snapshot.len()) {
            return false;
        }
        match self.items.last() {
            Some(last) => snapshot[self.items.len() - 1].id == last.id,
            None => true,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn is_error_visible(&self) -> bool {
        self.error_visible
    }

    pub fn dismiss_error(&mut self) {
        self.error_visible = false;
    }

    /// Whether scrolling to row `last_visible` should trigger `request_more`.
    ///
    /// Fires once the last visible row is within the trigger threshold of the
    /// end, and never while a fetch is running or after the feed ran out.
    #[must_use]
    pub fn should_request_more(&self, last_visible: usize, status: &FeedStatus) -> bool {
        if status.loading || status.exhausted || self.items.is_empty() {
            return false;
        }
        last_visible
            .saturating_add(1)
            .saturating_add(self.trigger_threshold)
            >= self.items.len()
    }

    /// Scroll position to restore, clamped to the rows shown.
    #[must_use]
    pub fn restore_position(&self, status: &FeedStatus) -> usize {
        status.scroll_position.min(self.items.len().saturating_sub(1))
    }
}

impl Default for ListModel {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_TRIGGER_THRESHOLD)
    }
}
