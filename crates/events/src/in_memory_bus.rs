//! In-memory notification bus for tests/dev and single-process use.

use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// A thread panicked while holding the subscriber list.
    #[error("notification bus lock poisoned")]
    Poisoned,
}

/// Single-process broadcast bus over std channels.
///
/// Publishing is synchronous and never blocks on a slow listener; each
/// subscriber owns an unbounded queue. Subscriptions that were dropped are
/// forgotten on the next publish.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscribers that were alive at the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut senders = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // A failed send means its `Subscription` was dropped.
        senders.retain(|tx| tx.send(message.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        match self.subscribers.lock() {
            Ok(mut senders) => senders.push(tx),
            // `tx` is dropped here, so the subscription reads as disconnected.
            Err(_) => drop(tx),
        }

        Subscription::new(rx)
    }
}
