//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two prices of the
/// same amount are the same price; two leads with the same asking price are
/// still two different leads.
///
/// To "modify" a value object, build a new one (e.g. `Money::checked_add`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
