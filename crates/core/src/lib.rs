//! `invdb-core`: foundation building blocks.
//!
//! This crate contains **pure** primitives (no infrastructure concerns): the
//! error taxonomy, identity/value markers and index ranges.

pub mod entity;
pub mod error;
pub mod range;
pub mod value_object;

pub use entity::Entity;
pub use error::{ConfigError, QueryError, StartupError, UpdateError};
pub use range::IndexRange;
pub use value_object::ValueObject;
