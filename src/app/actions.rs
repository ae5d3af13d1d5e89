//! Actions representing side effects to be executed by the coordinator.
//!
//! The event handler never performs I/O itself. After processing an event it
//! returns a `Vec<Action>` describing what must happen next: a page request to
//! hand to the media source, and/or a change event to deliver to subscribers.
//! The coordinator executes them in order.
//!
//! # Example
//!
//! ```rust
//! use mediafeed::app::{Action, ChangeEvent};
//!
//! let actions = vec![Action::Notify(ChangeEvent::Reset)];
//! assert!(actions[0].is_notify());
//! ```

use super::notifier::ChangeEvent;
use crate::fetch::{FetchTicket, PageRequest};

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Issues one call to the media source.
    ///
    /// The ticket travels alongside the request and comes back with the
    /// completion so the handler can tell current results from stale ones.
    Dispatch {
        ticket: FetchTicket,
        request: PageRequest,
    },

    /// Delivers a change event to every subscriber.
    Notify(ChangeEvent),
}

impl Action {
    #[must_use]
    pub const fn is_notify(&self) -> bool {
        matches!(self, Self::Notify(_))
    }

    #[must_use]
    pub const fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch { .. })
    }
}
