//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stored records are keyed by their identity; replacing a record keeps its id
/// and swaps every other field.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
