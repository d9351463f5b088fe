//! Test doubles shared by the engine's update and query tests.

use async_trait::async_trait;

use invdb_core::IndexRange;
use invdb_inventory::{Entry, InventoryDbOptions};

use super::InventoryDb;
use crate::entry_store::{EntryStore, StoreError};

/// Store whose reads lose the connection and whose writes hit a full disk.
pub(crate) struct BrokenStore;

#[async_trait]
impl EntryStore for BrokenStore {
    async fn get(&self, _index: u64) -> Result<Option<Entry>, StoreError> {
        Err(StoreError::Connection("link down".into()))
    }

    async fn get_range(&self, _range: IndexRange) -> Result<Vec<Entry>, StoreError> {
        Err(StoreError::Connection("link down".into()))
    }

    async fn upsert(&self, _entry: Entry) -> Result<(), StoreError> {
        Err(StoreError::Write("disk full".into()))
    }

    async fn upsert_many(&self, _entries: Vec<Entry>) -> Result<(), StoreError> {
        Err(StoreError::Write("disk full".into()))
    }
}

/// Engine named `test` with ten slots over `store`.
pub(crate) fn engine_over<S: EntryStore>(store: S) -> InventoryDb<S> {
    let config = InventoryDbOptions::new()
        .name("test")
        .url("memory://")
        .num_entries(10)
        .validate()
        .unwrap();
    InventoryDb::with_store(config, store)
}
