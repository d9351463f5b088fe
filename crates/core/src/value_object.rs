//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same values are
/// the same value. They are immutable once built; "modifying" one means
/// building a new one.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: `IndexRange { start: 0, end: 10 }` is equal to any other
///   range with the same bounds
/// - **Entity**: an inventory `Entry` is the record at its index, whatever its
///   quantity happens to be
///
/// ```ignore
/// let a = IndexRange::new(0, 10)?;
/// let b = IndexRange::new(0, 10)?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
