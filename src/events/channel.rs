//! Progress events over crossbeam channels.
//!
//! Indexing and import run on the caller's thread and push events; a display
//! thread drains them.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Producer side, handed to the indexing and import code
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Wrap a crossbeam sender
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    /// Push an event; it is dropped silently when nobody listens any more
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Consumer side, drained by a progress display
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Wait for the next event; `None` once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Next event if one is waiting
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Events until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

fn pair((sender, receiver): (Sender<Event>, Receiver<Event>)) -> (EventSender, EventReceiver) {
    (EventSender::new(sender), EventReceiver { inner: receiver })
}

/// Constructors for connected sender and receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Channel without a size limit
    pub fn new() -> (EventSender, EventReceiver) {
        pair(unbounded())
    }

    /// Channel holding at most `capacity` events; senders block when full
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        pair(bounded(capacity))
    }
}

/// Sender for callers that show no progress
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}
