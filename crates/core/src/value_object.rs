//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Two value objects with the same attribute values are the same value. A
/// product snapshot captured at checkout is one: it never changes, and a later
/// edit to the catalog entry produces a different snapshot rather than
/// mutating the old one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Price { minor_units: u64 }
///
/// impl ValueObject for Price {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
