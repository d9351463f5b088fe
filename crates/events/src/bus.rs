//! Notification publishing/subscription abstraction (mechanics only).
//!
//! Engine outcomes (`started`, `updated`, `gotEntry`, ..., `error`) are
//! published on a bus so that any number of listeners can observe them.
//!
//! The bus is intentionally **lightweight**:
//!
//! - **Transport-agnostic**: in-memory channels today, anything with pub/sub later
//! - **Broadcast**: every subscriber gets its own copy of every notification
//! - **No replay**: a subscriber only sees what is published after it subscribed,
//!   so listeners must subscribe *before* issuing the request they wait on
//! - **No persistence**: the store is the source of truth, the bus only distributes

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a notification stream.
///
/// ```ignore
/// let sub = bus.subscribe();
/// dispatcher.dispatch(Request::GetEntry(3)).await;
///
/// match sub.recv_timeout(Duration::from_secs(1)) {
///     Ok(envelope) => handle(envelope.payload()),
///     Err(RecvTimeoutError::Timeout) => retry(),
///     Err(RecvTimeoutError::Disconnected) => shutdown(),
/// }
/// ```
///
/// Subscriptions are meant for a single consumer; fan a subscription out through
/// your own channel if several threads need it.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic notification bus (pub/sub abstraction).
///
/// ```text
/// Request → Engine (validate, read/write store) → Bus (publish outcome) → Listeners
/// ```
///
/// `publish()` can fail (e.g. the bus is poisoned or closed). The failure is
/// surfaced to the publisher, which decides whether it matters; the outcome of
/// the request itself is already decided by then.
///
/// Implementations must be `Send + Sync`: many requests publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
