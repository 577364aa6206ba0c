//! Value object trait: equality by value, not identity.
//!
//! Category tags, language tags and filter states are value objects: two
//! instances holding the same values are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct FilterState {
///     category: CategorySelection,
///     search: String,
/// }
///
/// impl ValueObject for FilterState {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

impl ValueObject for crate::id::Language {}
