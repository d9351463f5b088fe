//! Infrastructure layer: the inventory engine, its storage adapters and the
//! request dispatcher that publishes outcomes.

pub mod dispatcher;
pub mod engine;
pub mod entry_store;


pub use dispatcher::{Dispatcher, InventoryEnvelope, Request};
pub use engine::{Connecting, InventoryDb};
pub use entry_store::{
    EntryStore, InMemoryConnector, InMemoryEntryStore, PostgresConnector, PostgresEntryStore,
    StoreConnector, StoreError,
};
