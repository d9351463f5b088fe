//! Input validation run before any storage call.
//!
//! Everything here is synchronous and side-effect free: a request that fails
//! validation never reaches the store.

use invdb_core::{IndexRange, QueryError, UpdateError};

use crate::entry::Entry;

/// Check a single entry against the engine capacity.
///
/// The index is checked first, then the quantity, then the attribute keys.
pub fn validate_entry(entry: &Entry, num_entries: u64) -> Result<(), UpdateError> {
    if entry.index >= num_entries {
        return Err(UpdateError::IndexOutOfRange {
            index: entry.index,
            num_entries,
        });
    }
    if entry.quantity < 0 {
        return Err(UpdateError::NegativeQuantity {
            index: entry.index,
            quantity: entry.quantity,
        });
    }
    if let Some(key) = entry.reserved_attribute() {
        return Err(UpdateError::ReservedAttribute {
            index: entry.index,
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Check every entry of a batch; the first failure rejects the whole batch.
pub fn validate_batch(entries: &[Entry], num_entries: u64) -> Result<(), UpdateError> {
    for (position, entry) in entries.iter().enumerate() {
        validate_entry(entry, num_entries).map_err(|e| UpdateError::in_batch(position, e))?;
    }
    Ok(())
}

/// Check a point-lookup index.
pub fn validate_index(index: u64, num_entries: u64) -> Result<(), QueryError> {
    if index >= num_entries {
        return Err(QueryError::IndexOutOfRange { index, num_entries });
    }
    Ok(())
}

/// Check range-query bounds: `start <= end <= num_entries`.
pub fn validate_range(start: u64, end: u64, num_entries: u64) -> Result<IndexRange, QueryError> {
    if start > end {
        return Err(QueryError::InvertedRange { start, end });
    }
    if end > num_entries {
        return Err(QueryError::BoundOutOfRange {
            bound: end,
            num_entries,
        });
    }
    // start <= end <= num_entries, so start is in bounds too.
    IndexRange::new(start, end)
}
