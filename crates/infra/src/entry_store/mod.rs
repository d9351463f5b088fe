//! Storage adapter boundary.
//!
//! The engine reads and writes inventory entries only through [`EntryStore`],
//! and opens its handle through a [`StoreConnector`]. Durability belongs to
//! the backend.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::{InMemoryConnector, InMemoryEntryStore};
pub use postgres::{PostgresConnector, PostgresEntryStore};
pub use r#trait::{EntryStore, StoreConnector, StoreError};
