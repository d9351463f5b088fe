//! Query path: point lookups, positional range reads, availability.

use tracing::{error, instrument, warn};

use invdb_core::{IndexRange, QueryError};
use invdb_inventory::{Availability, Entry, positional_slots, validate_index, validate_range};

use super::InventoryDb;
use crate::entry_store::EntryStore;

impl<S> InventoryDb<S>
where
    S: EntryStore,
{
    /// Entry stored at `index`.
    ///
    /// `Ok(None)` means the slot is valid but empty; an index outside the
    /// capacity is an error.
    #[instrument(skip(self), fields(db_name = %self.name()))]
    pub async fn get_entry(&self, index: u64) -> Result<Option<Entry>, QueryError> {
        if let Err(err) = validate_index(index, self.capacity()) {
            warn!(error = %err, "rejected lookup");
            return Err(err);
        }

        self.store().get(index).await.map_err(|e| {
            error!(error = %e, "lookup failed");
            QueryError::from(e)
        })
    }

    /// One slot per index in `[start, end)`, in order; empty slots are `None`.
    #[instrument(skip(self), fields(db_name = %self.name()))]
    pub async fn get_entries(&self, start: u64, end: u64) -> Result<Vec<Option<Entry>>, QueryError> {
        let range = self.checked_range(start, end)?;
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self.read_range(range).await?;
        Ok(positional_slots(range, stored))
    }

    /// In-stock entries of `[start, end)` and their total quantity.
    #[instrument(skip(self), fields(db_name = %self.name()))]
    pub async fn get_available(&self, start: u64, end: u64) -> Result<Availability, QueryError> {
        let range = self.checked_range(start, end)?;
        if range.is_empty() {
            return Ok(Availability::default());
        }

        let stored = self.read_range(range).await?;
        Ok(Availability::from_entries(&stored))
    }

    fn checked_range(&self, start: u64, end: u64) -> Result<IndexRange, QueryError> {
        validate_range(start, end, self.capacity()).inspect_err(|err| {
            warn!(error = %err, "rejected range query");
        })
    }

    async fn read_range(&self, range: IndexRange) -> Result<Vec<Entry>, QueryError> {
        self.store().get_range(range).await.map_err(|e| {
            error!(error = %e, %range, "range read failed");
            QueryError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::engine::test_support::{BrokenStore, engine_over};
    use crate::entry_store::InMemoryEntryStore;

    // Capacity of `engine_over`.
    const N: u64 = 10;

    fn db() -> InventoryDb<Arc<InMemoryEntryStore>> {
        engine_over(InMemoryEntryStore::arc())
    }

    #[tokio::test]
    async fn empty_slot_is_not_an_error() {
        let db = db();
        assert_eq!(db.get_entry(4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn out_of_range_lookup_is_an_error() {
        let db = db();
        let err = db.get_entry(N).await.unwrap_err();
        assert_eq!(err, QueryError::IndexOutOfRange { index: N, num_entries: N });
    }

    #[tokio::test]
    async fn range_keeps_positions() {
        let db = db();
        db.updates(vec![Entry::new(2, 1), Entry::new(5, 3)]).await.unwrap();

        let slots = db.get_entries(2, 6).await.unwrap();

        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], Some(Entry::new(2, 1)));
        assert_eq!(slots[1], None);
        assert_eq!(slots[2], None);
        assert_eq!(slots[3], Some(Entry::new(5, 3)));
    }

    #[tokio::test]
    async fn full_range_is_allowed() {
        let db = db();
        assert_eq!(db.get_entries(0, N).await.unwrap().len(), N as usize);
        assert!(db.get_entries(N, N).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn range_bound_violations() {
        let db = db();

        assert_eq!(
            db.get_entries(5, 2).await.unwrap_err(),
            QueryError::InvertedRange { start: 5, end: 2 }
        );
        assert_eq!(
            db.get_entries(0, N + 1).await.unwrap_err(),
            QueryError::BoundOutOfRange { bound: N + 1, num_entries: N }
        );
        assert_eq!(
            db.get_available(5, 2).await.unwrap_err(),
            QueryError::InvertedRange { start: 5, end: 2 }
        );
        assert_eq!(
            db.get_available(N + 1, N + 3).await.unwrap_err(),
            QueryError::BoundOutOfRange { bound: N + 3, num_entries: N }
        );
    }

    #[tokio::test]
    async fn availability_excludes_zero_quantities() {
        let db = db();
        db.updates(vec![Entry::new(1, 4), Entry::new(3, 0), Entry::new(6, 2), Entry::new(9, 1)])
            .await
            .unwrap();

        let available = db.get_available(0, 7).await.unwrap();

        assert_eq!(available.indices(), vec![1, 6]);
        assert_eq!(available.total_quantity, 6);
    }

    #[tokio::test]
    async fn storage_failures_become_query_errors() {
        let db = engine_over(BrokenStore);
        let expected = QueryError::Storage("connection error: link down".to_string());

        let err = db.get_entry(2).await.unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(err.to_string(), "storage read failed: connection error: link down");
        assert!(!err.is_validation());

        let err = db.get_entries(0, 5).await.unwrap_err();
        assert_eq!(err, expected);
        assert!(!err.is_validation());

        let err = db.get_available(0, 10).await.unwrap_err();
        assert_eq!(err, expected);
        assert!(!err.is_validation());

        // Validation still wins over storage.
        assert!(db.get_entries(4, 1).await.unwrap_err().is_validation());
        // An empty range never touches the store.
        assert!(db.get_entries(3, 3).await.unwrap().is_empty());
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: a range read has one slot per index, and each filled slot
        /// holds the last value written at that index.
        #[test]
        fn range_slots_track_last_writes(
            batch in proptest::collection::vec((0u64..N, 0i64..20), 0..30),
            bounds in (0u64..=N, 0u64..=N),
        ) {
            let (start, end) = if bounds.0 <= bounds.1 { bounds } else { (bounds.1, bounds.0) };
            let db = db();
            let entries: Vec<Entry> = batch.iter().map(|(i, q)| Entry::new(*i, *q)).collect();

            let slots = block_on(async {
                db.updates(entries).await.unwrap();
                db.get_entries(start, end).await.unwrap()
            });

            prop_assert_eq!(slots.len() as u64, end - start);
            for (offset, slot) in slots.iter().enumerate() {
                let index = start + offset as u64;
                let last = batch.iter().rev().find(|(i, _)| *i == index).map(|(_, q)| *q);
                prop_assert_eq!(slot.as_ref().map(|e| e.quantity), last);
                if let Some(entry) = slot {
                    prop_assert_eq!(entry.index, index);
                }
            }
        }
    }
}
