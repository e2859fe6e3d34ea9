//! Live-update fan-out to connected subscribers.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;

/// Identifier for one connected subscriber.
pub type SubscriberId = u64;

/// Registry of live-update subscribers.
///
/// Each subscriber owns the receiving half of an unbounded channel; its
/// connection task forwards received payloads to the peer. Delivery is
/// best-effort and independent per subscriber: a subscriber whose receiver
/// has gone away is dropped from the registry without affecting the others
/// or the write that triggered the broadcast.
///
/// Subscribers see no backlog; only writes accepted after they subscribe.
pub struct ReportBroadcaster {
    inner: Mutex<Inner>,
}

struct Inner {
    next_id: SubscriberId,
    subscribers: HashMap<SubscriberId, mpsc::UnboundedSender<String>>,
}

impl ReportBroadcaster {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 0,
                subscribers: HashMap::new(),
            }),
        }
    }

    /// Registers a new subscriber, returning its id and the payload
    /// receiver.
    pub fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, tx);
        tracing::debug!(subscriber = id, "live subscriber connected");
        (id, rx)
    }

    /// Removes a subscriber. Idempotent.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let removed = self.inner.lock().unwrap().subscribers.remove(&id);
        if removed.is_some() {
            tracing::debug!(subscriber = id, "live subscriber disconnected");
        }
    }

    /// Delivers `payload` to every current subscriber, dropping any whose
    /// channel has closed.
    pub fn broadcast(&self, payload: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.retain(|id, tx| {
            let delivered = tx.send(payload.to_string()).is_ok();
            if !delivered {
                tracing::debug!(subscriber = *id, "dropping closed live subscriber");
            }
            delivered
        });
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }
}

impl Default for ReportBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
