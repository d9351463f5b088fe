//! Update path: validate, then upsert.

use tracing::{debug, error, instrument, warn};

use invdb_core::UpdateError;
use invdb_inventory::{Entry, collapse_last_write_wins, validate_batch, validate_entry};

use super::InventoryDb;
use crate::entry_store::EntryStore;

impl<S> InventoryDb<S>
where
    S: EntryStore,
{
    /// Insert or replace the entry at `entry.index`.
    ///
    /// A malformed entry is rejected without touching storage.
    #[instrument(skip(self, entry), fields(db_name = %self.name(), index = entry.index))]
    pub async fn update(&self, entry: Entry) -> Result<(), UpdateError> {
        if let Err(err) = validate_entry(&entry, self.capacity()) {
            warn!(error = %err, "rejected update");
            return Err(err);
        }

        self.store().upsert(entry).await.map_err(|e| {
            error!(error = %e, "upsert failed");
            UpdateError::from(e)
        })?;

        debug!("entry upserted");
        Ok(())
    }

    /// Apply a batch all-or-nothing.
    ///
    /// Every entry is validated before anything is written; one bad entry
    /// rejects the batch. Duplicate indices resolve to their last occurrence.
    #[instrument(skip(self, entries), fields(db_name = %self.name(), count = entries.len()))]
    pub async fn updates(&self, entries: Vec<Entry>) -> Result<(), UpdateError> {
        if let Err(err) = validate_batch(&entries, self.capacity()) {
            warn!(error = %err, "rejected batch");
            return Err(err);
        }

        if entries.is_empty() {
            debug!("empty batch");
            return Ok(());
        }

        let collapsed = collapse_last_write_wins(entries);
        let written = collapsed.len();

        self.store().upsert_many(collapsed).await.map_err(|e| {
            error!(error = %e, "batch upsert failed");
            UpdateError::from(e)
        })?;

        debug!(written, "batch upserted");
        Ok(())
    }
}
