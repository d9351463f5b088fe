//! Inventory domain module.
//!
//! This crate contains the inventory record model and the rules applied to it
//! (option checks, entry/batch/range validation, availability aggregation),
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod availability;
pub mod batch;
pub mod entry;
pub mod options;
pub mod validate;

pub use availability::Availability;
pub use batch::{collapse_last_write_wins, positional_slots};
pub use entry::{Entry, RESERVED_FIELDS};
pub use options::{InventoryDbConfig, InventoryDbOptions};
pub use validate::{validate_batch, validate_entry, validate_index, validate_range};
