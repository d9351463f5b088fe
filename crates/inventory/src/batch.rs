//! Batch shaping helpers for updates and range reads.

use std::collections::HashMap;

use invdb_core::{Entity, IndexRange};

use crate::entry::Entry;

/// Collapse duplicate indices so the last occurrence wins.
///
/// The result keeps the order in which each index first appeared, so writing
/// it leaves the same end state as applying the batch entry by entry.
pub fn collapse_last_write_wins(entries: Vec<Entry>) -> Vec<Entry> {
    let mut slot_of: HashMap<u64, usize> = HashMap::with_capacity(entries.len());
    let mut out: Vec<Entry> = Vec::with_capacity(entries.len());

    for entry in entries {
        match slot_of.get(entry.id()) {
            Some(&slot) => out[slot] = entry,
            None => {
                slot_of.insert(*entry.id(), out.len());
                out.push(entry);
            }
        }
    }

    out
}

/// Lay stored entries out positionally over `range`.
///
/// Slot `i` holds the entry at `range.start() + i`, or `None` when nothing is
/// stored there. Entries outside the range are ignored.
pub fn positional_slots(range: IndexRange, stored: Vec<Entry>) -> Vec<Option<Entry>> {
    let mut slots: Vec<Option<Entry>> = vec![None; range.len() as usize];
    for entry in stored {
        if range.contains(entry.index) {
            let slot = (entry.index - range.start()) as usize;
            slots[slot] = Some(entry);
        }
    }
    slots
}
