//! Session event fan-out.
//!
//! DESIGN
//! ======
//! Subscribers register explicitly and get an unbounded `mpsc` receiver.
//! Publishing is synchronous and never drops an event for a live
//! subscriber, however far behind it is. A closed channel is pruned from
//! the list.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use uuid::Uuid;

/// Login state transitions published by the session client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    Login,
    Logout,
}

impl SessionEvent {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "sessionLogin",
            Self::Logout => "sessionLogout",
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiving end of a subscription.
pub struct Subscription {
    pub id: Uuid,
    receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Subscription {
    /// Wait for the next event. `None` once the publisher side is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.receiver.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain everything delivered so far.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Subscriber list owned by a session client. Clones share the same list.
#[derive(Clone, Default)]
pub struct SessionEvents {
    subscribers: Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<SessionEvent>>>>,
}

impl SessionEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (tx, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.lock().insert(id, tx);
        Subscription { id, receiver }
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Deliver `event` to every live subscriber. Returns how many received it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let mut subscribers = self.lock();
        let mut delivered = 0_usize;
        subscribers.retain(|_, tx| {
            let open = tx.send(event).is_ok();
            if open {
                delivered = delivered.saturating_add(1);
            }
            open
        });
        tracing::debug!(%event, delivered, "session event published");
        delivered
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, mpsc::UnboundedSender<SessionEvent>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
