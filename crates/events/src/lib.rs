//! Engine notifications and the bus that carries them.

pub mod bus;
pub mod envelope;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{EventBus, Subscription};
pub use envelope::NotificationEnvelope;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notification::{ErrorKind, Notification, NotificationError};
