//! Typed change notifications for the list UI.
//!
//! Every store mutation or fetch failure produces exactly one [`ChangeEvent`].
//! The [`ChangeNotifier`] fans each event out, in emission order, to every live
//! subscriber. There is no replay buffer: a subscriber only sees events emitted
//! after it subscribed. Subscribers whose receiving side was dropped (a UI that
//! has been torn down) are pruned on the next emission.

use futures_util::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// What happened to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The whole collection was replaced.
    Reset,

    /// The last `count` items of the collection are new. `count` is never zero.
    Appended {
        count: usize,
    },

    /// A fetch failed; the collection was not touched.
    Failed,
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => f.write_str("Reset"),
            Self::Appended { count } => write!(f, "Appended, count:{count}"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// Fan-out of [`ChangeEvent`]s to the current subscribers.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Vec<UnboundedSender<ChangeEvent>>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber. Past events are not replayed.
    pub fn subscribe(&mut self) -> ChangeStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        tracing::debug!(subscribers = self.subscribers.len(), "change subscriber added");
        ChangeStream { rx }
    }

    /// Delivers `event` to every live subscriber.
    pub fn emit(&mut self, event: ChangeEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        tracing::debug!(
            event = %event,
            subscribers = self.subscribers.len(),
            "change event emitted"
        );
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }
}

/// Receiving side of a subscription.
#[derive(Debug)]
pub struct ChangeStream {
    rx: UnboundedReceiver<ChangeEvent>,
}

impl ChangeStream {
    /// Waits for the next event. Returns `None` once the session has ended and
    /// every pending event was consumed.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Takes the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every event queued so far.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Stream for ChangeStream {
    type Item = ChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_emission_order() {
        let mut notifier = ChangeNotifier::new();
        let mut stream = notifier.subscribe();

        notifier.emit(ChangeEvent::Reset);
        notifier.emit(ChangeEvent::Appended { count: 3 });
        notifier.emit(ChangeEvent::Failed);

        assert_eq!(
            stream.drain(),
            vec![
                ChangeEvent::Reset,
                ChangeEvent::Appended { count: 3 },
                ChangeEvent::Failed
            ]
        );
    }

    #[test]
    fn late_subscriber_misses_past_events() {
        let mut notifier = ChangeNotifier::new();
        let mut early = notifier.subscribe();
        notifier.emit(ChangeEvent::Reset);

        let mut late = notifier.subscribe();
        notifier.emit(ChangeEvent::Failed);

        assert_eq!(early.drain(), vec![ChangeEvent::Reset, ChangeEvent::Failed]);
        assert_eq!(late.drain(), vec![ChangeEvent::Failed]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut notifier = ChangeNotifier::new();
        let first = notifier.subscribe();
        let _second = notifier.subscribe();
        drop(first);

        assert_eq!(notifier.subscriber_count(), 1);
        notifier.emit(ChangeEvent::Reset);
        assert_eq!(notifier.subscribers.len(), 1);
    }

    #[test]
    fn display_format() {
        assert_eq!(ChangeEvent::Appended { count: 2 }.to_string(), "Appended, count:2");
        assert_eq!(ChangeEvent::Reset.to_string(), "Reset");
    }

    #[tokio::test]
    async fn stream_yields_events() {
        use futures_util::StreamExt;

        let mut notifier = ChangeNotifier::new();
        let mut stream = notifier.subscribe();
        notifier.emit(ChangeEvent::Appended { count: 1 });
        drop(notifier);

        assert_eq!(stream.next().await, Some(ChangeEvent::Appended { count: 1 }));
        assert_eq!(stream.next().await, None);
    }
}
