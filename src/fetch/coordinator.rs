//! Async runtime driving a feed session.
//!
//! [`FetchCoordinator`] owns the [`Session`] and is the only code that mutates
//! it. Everything reaches it through one ordered command queue: UI triggers
//! sent by [`SessionHandle`]s, and page completions coming back from the media
//! source. Because both are processed one at a time on the coordinator task,
//! no lock guards the mode, the loading phase or the generation counter, and
//! events are emitted in the exact order of the mutations that caused them.
//!
//! # Architecture
//!
//! ```text
//! SessionHandle ──commands──▶ FetchCoordinator::run ──Dispatch──▶ MediaFetchPort
//!      ▲   ▲                     │      ▲                              │
//!      │   └──── FeedStatus ─────┤      └──── PageCompletion ◀─────────┘
//!      └──────── ChangeEvent ────┘
//! ```
//!
//! The coordinator keeps running until every handle has been dropped, which is
//! the end of the session. Port futures still in flight at that point are
//! dropped with it.

use super::messages::PageCompletion;
use super::port::MediaFetchPort;
use crate::app::{
    handle_event, Action, ChangeNotifier, ChangeStream, Event, FeedStatus, Session, Snapshot,
    StoreReader,
};
use crate::domain::{FeedError, Result};
use crate::Config;
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot, watch};

/// Messages from handles to the coordinator task.
#[derive(Debug)]
enum Command {
    Event(Event),
    Flush(oneshot::Sender<()>),
}

type SharedNotifier = Arc<Mutex<ChangeNotifier>>;

/// Owner of a [`Session`], serializing every state transition.
pub struct FetchCoordinator<P> {
    session: Session,
    port: P,
    notifier: SharedNotifier,
    status: watch::Sender<FeedStatus>,
    commands: mpsc::UnboundedReceiver<Command>,
    in_flight: FuturesUnordered<BoxFuture<'static, PageCompletion>>,
}

impl<P: MediaFetchPort> FetchCoordinator<P> {
    /// Creates a coordinator for a fresh trending session.
    ///
    /// Returns the coordinator, which must be driven with [`run`](Self::run),
    /// and the first handle to it.
    pub fn new(config: &Config, port: P) -> (Self, SessionHandle) {
        Self::with_session(Session::new(config.page_size), port)
    }

    /// Creates a coordinator around an existing session.
    pub fn with_session(session: Session, port: P) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(session.status());
        let notifier: SharedNotifier = Arc::new(Mutex::new(ChangeNotifier::new()));

        let handle = SessionHandle {
            commands: command_tx,
            notifier: Arc::clone(&notifier),
            reader: session.reader(),
            status: status_rx,
        };

        tracing::debug!(page_size = session.page_size(), mode = %session.current_mode(), "feed session created");

        let coordinator = Self {
            session,
            port,
            notifier,
            status: status_tx,
            commands: command_rx,
            in_flight: FuturesUnordered::new(),
        };

        (coordinator, handle)
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Number of port calls whose completion has not been processed yet,
    /// including superseded ones.
    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.in_flight.len()
    }

    /// Applies one event and executes the resulting actions.
    pub fn process(&mut self, event: Event) {
        let actions = handle_event(&mut self.session, event);

        tracing::trace!(action_count = actions.len(), "event handled");

        for action in actions {
            self.execute(action);
        }

        self.status.send_replace(self.session.status());
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Dispatch { ticket, request } => {
                let page = self.port.fetch_page(request);
                self.in_flight.push(
                    async move {
                        let result = page.await;
                        PageCompletion::new(ticket, result)
                    }
                    .boxed(),
                );
            }
            Action::Notify(event) => {
                self.notifier
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .emit(event);
            }
        }
    }

    /// Drives the session until every [`SessionHandle`] is dropped, then
    /// returns the final session state.
    pub async fn run(mut self) -> Session {
        tracing::debug!("feed session running");

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    match command {
                        Command::Event(event) => self.process(event),
                        Command::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.process(Event::PageLoaded(completion));
                }
            }
        }

        tracing::debug!(
            dropped_fetches = self.in_flight.len(),
            item_count = self.session.store().len(),
            "feed session ended"
        );
        self.session
    }
}

impl<P> std::fmt::Debug for FetchCoordinator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("session", &self.session)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

/// Cloneable entry point to a running session.
///
/// Handles are cheap to clone and are what a UI keeps. A UI that is torn down
/// and recreated keeps using the same handle (or a clone of it); the session,
/// its collection and its mode survive.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    notifier: SharedNotifier,
    reader: StoreReader,
    status: watch::Receiver<FeedStatus>,
}

impl SessionHandle {
    /// Reloads the first page of the current mode.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SessionClosed`] if the coordinator has stopped.
    pub fn request_refresh(&self) -> Result<()> {
        self.send(Event::RequestRefresh)
    }

    /// Loads the page following the current collection. Dropped by the
    /// session if a fetch is already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SessionClosed`] if the coordinator has stopped.
    pub fn request_more(&self) -> Result<()> {
        self.send(Event::RequestMore)
    }

    /// Switches to the trending feed and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SessionClosed`] if the coordinator has stopped.
    pub fn show_trending(&self) -> Result<()> {
        self.send(Event::ShowTrending)
    }

    /// Switches to a search and refreshes. An empty query has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SessionClosed`] if the coordinator has stopped.
    pub fn show_search(&self, query: impl Into<String>) -> Result<()> {
        self.send(Event::ShowSearch {
            query: query.into(),
        })
    }

    /// Stores the UI's scroll position in the session.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SessionClosed`] if the coordinator has stopped.
    pub fn save_scroll_position(&self, position: usize) -> Result<()> {
        self.send(Event::SaveScrollPosition(position))
    }

    /// Subscribes to change events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> ChangeStream {
        self.notifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.reader.snapshot()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reader.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    /// Status as of the last processed command or completion.
    #[must_use]
    pub fn status(&self) -> FeedStatus {
        self.status.borrow().clone()
    }

    /// A receiver notified whenever the status changes.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<FeedStatus> {
        self.status.clone()
    }

    /// Resolves once every command sent before it has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SessionClosed`] if the coordinator has stopped.
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.commands
            .send(Command::Flush(done_tx))
            .map_err(|_| FeedError::SessionClosed)?;
        done_rx.await.map_err(|_| FeedError::SessionClosed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, event: Event) -> Result<()> {
        self.commands.send(Command::Event(event)).map_err(|e| {
            tracing::debug!(command = ?e.0, "session closed, command not delivered");
            FeedError::SessionClosed
        })
    }
}
