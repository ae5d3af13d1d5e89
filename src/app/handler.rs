//! Event handling and the single-flight fetch state machine.
//!
//! This module implements the transition function of a feed session. Every
//! input (UI triggers and completed pages alike) arrives as an
//! [`Event`]; [`handle_event`] mutates the [`Session`] and returns the
//! [`Action`]s to execute. It performs no I/O, so every property of the state
//! machine can be checked without a runtime.
//!
//! # Transitions
//!
//! ```text
//!            RequestRefresh / RequestMore
//!   Idle ─────────────────────────────────▶ Loading(ticket)
//!    ▲                                          │
//!    └──────── PageLoaded(current ticket) ◀─────┘
//! ```
//!
//! - `RequestMore` while loading is dropped.
//! - `RequestRefresh` while loading is coalesced into the in-flight request,
//!   unless the mode changed since that request was built. Then the refresh
//!   supersedes it: a new generation is dispatched and the old completion is
//!   discarded when it arrives.
//! - `PageLoaded` with a ticket that is not current is discarded unprocessed.
//!
//! # Example
//!
//! ```rust
//! use mediafeed::app::{handle_event, Action, ChangeEvent, Event, Session};
//! use mediafeed::fetch::PageCompletion;
//! use mediafeed::MediaItem;
//!
//! let mut session = Session::new(25);
//! let actions = handle_event(&mut session, Event::RequestRefresh);
//! let Action::Dispatch { ticket, .. } = actions[0].clone() else { unreachable!() };
//!
//! let items = vec![MediaItem::new("a", "https://m/a.gif", 1, 1)];
//! let actions = handle_event(&mut session, Event::PageLoaded(PageCompletion::new(ticket, Ok(items))));
//! assert_eq!(actions, vec![Action::Notify(ChangeEvent::Reset)]);
//! ```

use super::notifier::ChangeEvent;
use super::{Action, Session};
use crate::fetch::{FetchKind, PageCompletion};

/// Inputs to the session state machine.
#[derive(Debug)]
pub enum Event {
    /// Reload the first page of the current mode (pull-to-refresh).
    RequestRefresh,

    /// Load the page after the current collection (scroll near the end).
    RequestMore,

    /// Switch to trending and refresh.
    ShowTrending,

    /// Switch to a search and refresh. Ignored for an empty query.
    ShowSearch {
        query: String,
    },

    /// A page request finished.
    PageLoaded(PageCompletion),

    /// Remember the UI's scroll position across its recreation.
    SaveScrollPosition(usize),
}

/// Processes one event against `session`, returning the side effects to run.
pub fn handle_event(session: &mut Session, event: Event) -> Vec<Action> {
    let _span = tracing::debug_span!(
        "handle_event",
        generation = session.generation(),
        loading = session.is_loading()
    )
    .entered();

    match event {
        Event::RequestRefresh => request_refresh(session),
        Event::RequestMore => request_more(session),
        Event::ShowTrending => {
            session.modes_mut().set_trending();
            request_refresh(session)
        }
        Event::ShowSearch { query } => {
            if session.modes_mut().set_search(&query) {
                request_refresh(session)
            } else {
                vec![]
            }
        }
        Event::PageLoaded(completion) => page_loaded(session, completion),
        Event::SaveScrollPosition(position) => {
            tracing::trace!(position, "scroll position saved");
            session.set_scroll_position(position);
            vec![]
        }
    }
}

fn request_refresh(session: &mut Session) -> Vec<Action> {
    if let Some(in_flight) = session.in_flight() {
        if &in_flight.mode == session.current_mode() {
            tracing::debug!(
                generation = in_flight.generation,
                kind = ?in_flight.kind,
                "refresh coalesced into in-flight request"
            );
            return vec![];
        }

        tracing::debug!(
            stale_generation = in_flight.generation,
            stale_mode = %in_flight.mode,
            mode = %session.current_mode(),
            "mode changed while loading, superseding in-flight request"
        );
    }

    dispatch(session, FetchKind::Refresh)
}

fn request_more(session: &mut Session) -> Vec<Action> {
    if let Some(in_flight) = session.in_flight() {
        tracing::debug!(
            generation = in_flight.generation,
            "request for more dropped, fetch already in flight"
        );
        return vec![];
    }

    dispatch(session, FetchKind::More)
}

fn dispatch(session: &mut Session, kind: FetchKind) -> Vec<Action> {
    let (ticket, request) = session.begin_fetch(kind);

    tracing::debug!(
        generation = ticket.generation,
        kind = ?ticket.kind,
        mode = %request.mode,
        offset = request.offset,
        page_size = request.page_size,
        "dispatching page request"
    );

    vec![Action::Dispatch { ticket, request }]
}

fn page_loaded(session: &mut Session, completion: PageCompletion) -> Vec<Action> {
    let PageCompletion { ticket, result } = completion;

    if !session.is_current(&ticket) {
        tracing::debug!(
            generation = ticket.generation,
            current_generation = session.generation(),
            mode = %ticket.mode,
            "discarding stale page"
        );
        return vec![];
    }

    session.finish_fetch();

    let event = match (ticket.kind, result) {
        (FetchKind::Refresh, Ok(items)) => {
            tracing::debug!(count = items.len(), mode = %ticket.mode, "refresh page applied");
            session.apply_reset(items);
            Some(ChangeEvent::Reset)
        }
        (FetchKind::More, Ok(items)) => {
            let count = items.len();
            session.apply_append(items);
            if count == 0 {
                tracing::debug!(mode = %ticket.mode, "empty page, feed exhausted");
                None
            } else {
                tracing::debug!(count, total = session.store().len(), "next page applied");
                Some(ChangeEvent::Appended { count })
            }
        }
        (kind, Err(e)) => {
            tracing::warn!(error = %e, kind = ?kind, mode = %ticket.mode, "page request failed");
            Some(ChangeEvent::Failed)
        }
    };

    event.map(Action::Notify).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedError, MediaItem, Mode};
    use crate::fetch::{FetchTicket, PageRequest};

    fn items(ids: &[&str]) -> Vec<MediaItem> {
        ids.iter()
            .map(|id| MediaItem::new(*id, format!("https://m/{id}.gif"), 200, 200))
            .collect()
    }

    fn dispatched(actions: &[Action]) -> (FetchTicket, PageRequest) {
        match actions {
            [Action::Dispatch { ticket, request }] => (ticket.clone(), request.clone()),
            other => panic!("expected a single dispatch, got {other:?}"),
        }
    }

    fn complete(
        session: &mut Session,
        ticket: FetchTicket,
        result: crate::fetch::PageResult,
    ) -> Vec<Action> {
        handle_event(session, Event::PageLoaded(PageCompletion::new(ticket, result)))
    }

    #[test]
    fn refresh_then_more_scenario() {
        let mut session = Session::new(25);

        let (ticket, request) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        assert_eq!(request.offset, 0);
        assert_eq!(request.mode, Mode::Trending);
        assert!(session.is_loading());

        let actions = complete(&mut session, ticket, Ok(items(&["i1", "i2", "i3"])));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Reset)]);
        assert_eq!(session.snapshot().to_vec(), items(&["i1", "i2", "i3"]));
        assert!(!session.is_loading());

        let (ticket, request) = dispatched(&handle_event(&mut session, Event::RequestMore));
        assert_eq!(request.offset, 3);

        // Fast scroll while the page is still loading.
        assert!(handle_event(&mut session, Event::RequestMore).is_empty());

        let actions = complete(&mut session, ticket, Ok(items(&["i4", "i5"])));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Appended { count: 2 })]);
        assert_eq!(
            session.snapshot().to_vec(),
            items(&["i1", "i2", "i3", "i4", "i5"])
        );
    }

    #[test]
    fn burst_of_more_requests_dispatches_once() {
        let mut session = Session::new(25);
        let mut dispatches = 0;
        for _ in 0..50 {
            dispatches += handle_event(&mut session, Event::RequestMore)
                .iter()
                .filter(|a| a.is_dispatch())
                .count();
        }
        assert_eq!(dispatches, 1);
    }

    #[test]
    fn failed_refresh_leaves_collection_and_allows_retry() {
        let mut session = Session::new(25);

        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        let actions = complete(&mut session, ticket, Err(FeedError::FetchFailed("boom".into())));

        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Failed)]);
        assert!(session.snapshot().is_empty());
        assert!(!session.is_loading());

        let actions = handle_event(&mut session, Event::RequestRefresh);
        assert!(actions[0].is_dispatch());
    }

    #[test]
    fn failed_more_is_retried_at_same_offset() {
        let mut session = Session::new(25);
        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        complete(&mut session, ticket, Ok(items(&["a", "b"])));

        let (ticket, request) = dispatched(&handle_event(&mut session, Event::RequestMore));
        assert_eq!(request.offset, 2);
        let actions = complete(&mut session, ticket, Err(FeedError::FetchFailed("x".into())));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Failed)]);
        assert_eq!(session.snapshot().to_vec(), items(&["a", "b"]));

        let (_, retry) = dispatched(&handle_event(&mut session, Event::RequestMore));
        assert_eq!(retry.offset, 2);
    }

    #[test]
    fn refresh_during_same_mode_load_is_coalesced() {
        let mut session = Session::new(25);
        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));

        assert!(handle_event(&mut session, Event::RequestRefresh).is_empty());

        let actions = complete(&mut session, ticket, Ok(items(&["a"])));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Reset)]);
    }

    #[test]
    fn refresh_during_more_is_coalesced() {
        let mut session = Session::new(25);
        let (_ticket, _) = dispatched(&handle_event(&mut session, Event::RequestMore));
        assert!(handle_event(&mut session, Event::RequestRefresh).is_empty());
    }

    #[test]
    fn search_switch_then_refresh_resets_once() {
        let mut session = Session::new(25);
        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        complete(&mut session, ticket, Ok(items(&["t1", "t2"])));

        let (ticket, request) = dispatched(&handle_event(
            &mut session,
            Event::ShowSearch {
                query: "cats".into(),
            },
        ));
        assert_eq!(request.mode, Mode::search("cats").unwrap());
        assert_eq!(request.offset, 0);

        let actions = complete(&mut session, ticket, Ok(items(&["a", "b"])));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Reset)]);
        assert_eq!(session.snapshot().to_vec(), items(&["a", "b"]));
    }

    #[test]
    fn empty_search_query_is_ignored() {
        let mut session = Session::new(25);
        let actions = handle_event(
            &mut session,
            Event::ShowSearch {
                query: String::new(),
            },
        );
        assert!(actions.is_empty());
        assert_eq!(session.current_mode(), &Mode::Trending);
        assert!(!session.is_loading());
    }

    #[test]
    fn mode_switch_supersedes_in_flight_and_discards_stale_result() {
        let mut session = Session::new(25);
        let (trending, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));

        let (search, request) = dispatched(&handle_event(
            &mut session,
            Event::ShowSearch {
                query: "cats".into(),
            },
        ));
        assert_eq!(request.mode, Mode::search("cats").unwrap());

        // The newer response arrives first and is applied.
        let actions = complete(&mut session, search, Ok(items(&["c1", "c2"])));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Reset)]);

        // The outdated trending response arrives late and is dropped.
        let actions = complete(&mut session, trending, Ok(items(&["t1"])));
        assert!(actions.is_empty());
        assert_eq!(session.snapshot().to_vec(), items(&["c1", "c2"]));
        assert!(!session.is_loading());
    }

    #[test]
    fn stale_result_while_newer_is_loading_keeps_loading() {
        let mut session = Session::new(25);
        let (trending, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        let (search, _) = dispatched(&handle_event(
            &mut session,
            Event::ShowSearch {
                query: "dogs".into(),
            },
        ));

        assert!(complete(&mut session, trending, Err(FeedError::FetchFailed("late".into()))).is_empty());
        assert!(session.is_loading());
        assert!(session.is_current(&search));
    }

    #[test]
    fn empty_more_page_emits_nothing_and_marks_exhausted() {
        let mut session = Session::new(25);
        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        complete(&mut session, ticket, Ok(items(&["a"])));

        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestMore));
        let actions = complete(&mut session, ticket, Ok(vec![]));

        assert!(actions.is_empty());
        assert!(session.is_exhausted());
        assert!(!session.is_loading());
        assert_eq!(session.snapshot().to_vec(), items(&["a"]));
    }

    #[test]
    fn empty_refresh_still_resets() {
        let mut session = Session::new(25);
        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        complete(&mut session, ticket, Ok(items(&["a"])));

        let (ticket, _) = dispatched(&handle_event(&mut session, Event::RequestRefresh));
        let actions = complete(&mut session, ticket, Ok(vec![]));
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Reset)]);
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn scroll_position_is_stored_verbatim() {
        let mut session = Session::new(25);
        assert!(handle_event(&mut session, Event::SaveScrollPosition(42)).is_empty());
        assert_eq!(session.scroll_position(), 42);
    }
}
