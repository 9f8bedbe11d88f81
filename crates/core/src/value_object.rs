//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by value: two `Quantity(5)`
/// values are interchangeable, and "changing" one means producing a new value
/// (see `Quantity::adjusted`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
