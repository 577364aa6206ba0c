//! Entity trait: identity that survives localization and annotation.

/// Something with a stable product identity.
///
/// A catalog product and every display copy made from it answer with the
/// same id, so selection and comparison match on identity only.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether this record carries `id`.
    fn has_id(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
