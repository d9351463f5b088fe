//! Inventory engine: lifecycle, update path and query path.
//!
//! ```text
//! InventoryDbOptions ──validate (sync)──▶ Connecting ──connect (async)──▶ InventoryDb (ready)
//!                          │                                │
//!                          ▼                                ▼
//!                     ConfigError                     StartupError
//! ```
//!
//! A ready [`InventoryDb`] only exists once its store is connected, so no
//! request can be issued against a half-started engine. Every request
//! validates synchronously first and only then suspends on the store.

mod query;
mod update;

#[cfg(test)]
mod test_support;

use tracing::{info, instrument, warn};

use invdb_core::{ConfigError, StartupError};
use invdb_inventory::{InventoryDbConfig, InventoryDbOptions};

use crate::entry_store::{EntryStore, StoreConnector};

/// An engine whose options passed validation but whose store is not connected yet.
#[derive(Debug, Clone)]
pub struct Connecting {
    config: InventoryDbConfig,
}

impl Connecting {
    /// Validate construction options.
    ///
    /// Fails synchronously, before any connection attempt.
    pub fn new(options: InventoryDbOptions) -> Result<Self, ConfigError> {
        match options.validate() {
            Ok(config) => Ok(Self { config }),
            Err(err) => {
                warn!(error = %err, "rejected inventory db options");
                Err(err)
            }
        }
    }

    pub fn config(&self) -> &InventoryDbConfig {
        &self.config
    }

    /// Open the storage handle and return the ready engine.
    #[instrument(skip(self, connector), fields(db_name = %self.config.name()))]
    pub async fn start<C>(self, connector: &C) -> Result<InventoryDb<C::Store>, StartupError>
    where
        C: StoreConnector,
    {
        let store = connector.connect(&self.config).await.map_err(|e| {
            warn!(error = %e, "storage connection failed");
            StartupError::from(e)
        })?;

        Ok(InventoryDb::with_store(self.config, store))
    }
}

/// Ready inventory engine.
///
/// Owns one storage handle shared by all requests and the capacity bound
/// fixed at construction. Share it with `Arc`; it takes no locks of its own,
/// so concurrent writes to one index resolve last-write-wins in the store.
#[derive(Debug)]
pub struct InventoryDb<S> {
    config: InventoryDbConfig,
    store: S,
}

impl<S> InventoryDb<S>
where
    S: EntryStore,
{
    /// Build a ready engine over an already-open store.
    pub fn with_store(config: InventoryDbConfig, store: S) -> Self {
        info!(
            db_name = %config.name(),
            num_entries = config.num_entries(),
            "inventory db ready"
        );
        Self { config, store }
    }

    pub fn config(&self) -> &InventoryDbConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Capacity bound: valid indices are `[0, capacity)`.
    pub fn capacity(&self) -> u64 {
        self.config.num_entries()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_store::InMemoryConnector;

    fn options() -> InventoryDbOptions {
        InventoryDbOptions::new()
            .name("test")
            .url("memory://inventory")
            .num_entries(10)
    }

    #[test]
    fn invalid_options_fail_before_connecting() {
        let err = Connecting::new(InventoryDbOptions { url: None, ..options() }).unwrap_err();
        assert_eq!(err.to_string(), "url is required");

        let err = Connecting::new(InventoryDbOptions {
            num_entries: None,
            ..options()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "numEntries is required");

        let err = Connecting::new(options().num_entries(0)).unwrap_err();
        assert_eq!(err.to_string(), "numEntries must be a positive integer, got 0");
    }

    #[tokio::test]
    async fn starts_with_a_working_connector() {
        let db = Connecting::new(options())
            .unwrap()
            .start(&InMemoryConnector::new())
            .await
            .unwrap();

        assert_eq!(db.name(), "test");
        assert_eq!(db.capacity(), 10);
    }

    #[tokio::test]
    async fn connection_failure_is_a_startup_error() {
        let err = Connecting::new(options())
            .unwrap()
            .start(&InMemoryConnector::failing("refused"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StartupError::Storage("connection error: refused (test)".to_string())
        );
    }
}
