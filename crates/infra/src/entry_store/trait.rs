use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use invdb_core::{IndexRange, QueryError, StartupError, UpdateError};
use invdb_inventory::{Entry, InventoryDbConfig};

/// Storage collaborator failure.
///
/// These are **infrastructure errors** (connectivity, IO, encoding) as opposed
/// to validation errors. The engine folds them into `UpdateError::Storage`,
/// `QueryError::Storage` or `StartupError::Storage` before they reach callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<StoreError> for UpdateError {
    fn from(value: StoreError) -> Self {
        UpdateError::Storage(value.to_string())
    }
}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        QueryError::Storage(value.to_string())
    }
}

impl From<StoreError> for StartupError {
    fn from(value: StoreError) -> Self {
        StartupError::Storage(value.to_string())
    }
}

/// Persistent home of inventory entries, keyed by index.
///
/// ## Contract
///
/// - `get` returns `Ok(None)` for an index with no record; absence is not an error
/// - `get_range` returns only the records that exist in `range`, ascending by index
/// - `upsert` replaces the whole record at `entry.index` (or inserts it); readers
///   observe either the old or the new record, never a mix
/// - `upsert_many` applies every entry or none; callers pass distinct indices
///
/// Implementations must be `Send + Sync`: one handle is shared by every
/// in-flight request and the engine never locks it.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn get(&self, index: u64) -> Result<Option<Entry>, StoreError>;

    async fn get_range(&self, range: IndexRange) -> Result<Vec<Entry>, StoreError>;

    async fn upsert(&self, entry: Entry) -> Result<(), StoreError>;

    async fn upsert_many(&self, entries: Vec<Entry>) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> EntryStore for Arc<S>
where
    S: EntryStore + ?Sized,
{
    async fn get(&self, index: u64) -> Result<Option<Entry>, StoreError> {
        (**self).get(index).await
    }

    async fn get_range(&self, range: IndexRange) -> Result<Vec<Entry>, StoreError> {
        (**self).get_range(range).await
    }

    async fn upsert(&self, entry: Entry) -> Result<(), StoreError> {
        (**self).upsert(entry).await
    }

    async fn upsert_many(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        (**self).upsert_many(entries).await
    }
}

/// Storage connection factory.
///
/// Opens the handle an engine will use for its whole life, from the validated
/// configuration (`name` scopes the data, `url` locates the store).
#[async_trait]
pub trait StoreConnector: Send + Sync {
    type Store: EntryStore + 'static;

    async fn connect(&self, config: &InventoryDbConfig) -> Result<Self::Store, StoreError>;
}
