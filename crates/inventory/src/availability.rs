use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// Summary of the in-stock entries of a range.
///
/// `entries` holds every entry with a positive quantity, in ascending index
/// order; `total_quantity` is the sum of their quantities (saturating).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub entries: Vec<Entry>,
    pub total_quantity: i64,
}

impl Availability {
    /// Aggregate over any set of entries. Input order does not matter.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut available: Vec<Entry> = entries
            .into_iter()
            .filter(|e| e.is_available())
            .cloned()
            .collect();
        available.sort_by_key(|e| e.index);

        let total_quantity = available
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.quantity));

        Self {
            entries: available,
            total_quantity,
        }
    }

    pub fn indices(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.index).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
