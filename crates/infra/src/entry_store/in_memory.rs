use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use invdb_core::IndexRange;
use invdb_inventory::{Entry, InventoryDbConfig};

use super::r#trait::{EntryStore, StoreConnector, StoreError};

/// In-memory entry store.
///
/// Intended for tests/dev. Records live in an ordered map so range reads come
/// out ascending; every write replaces whole records under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryEntryStore {
    entries: RwLock<BTreeMap<u64, Entry>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored record, ascending by index.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries
            .read()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn get(&self, index: u64) -> Result<Option<Entry>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Read("lock poisoned".to_string()))?;

        Ok(entries.get(&index).cloned())
    }

    async fn get_range(&self, range: IndexRange) -> Result<Vec<Entry>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Read("lock poisoned".to_string()))?;

        Ok(entries
            .range(range.start()..range.end())
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn upsert(&self, entry: Entry) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Write("lock poisoned".to_string()))?;

        entries.insert(entry.index, entry);
        Ok(())
    }

    async fn upsert_many(&self, batch: Vec<Entry>) -> Result<(), StoreError> {
        // One write lock for the whole batch: readers see all of it or none of it.
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Write("lock poisoned".to_string()))?;

        for entry in batch {
            entries.insert(entry.index, entry);
        }
        Ok(())
    }
}

/// Connector handing out a shared in-memory store.
///
/// Every `connect` returns the same store, so engines built from one connector
/// see each other's writes (like two clients of one database).
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    store: Arc<InMemoryEntryStore>,
    failure: Option<String>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector over an existing store.
    pub fn with_store(store: Arc<InMemoryEntryStore>) -> Self {
        Self {
            store,
            failure: None,
        }
    }

    /// Connector whose every `connect` fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            store: InMemoryEntryStore::arc(),
            failure: Some(message.into()),
        }
    }

    pub fn store(&self) -> &Arc<InMemoryEntryStore> {
        &self.store
    }
}

#[async_trait]
impl StoreConnector for InMemoryConnector {
    type Store = Arc<InMemoryEntryStore>;

    async fn connect(&self, config: &InventoryDbConfig) -> Result<Self::Store, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Connection(format!("{} ({})", message, config.name())));
        }
        Ok(self.store.clone())
    }
}
