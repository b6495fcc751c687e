//! Records with a stable identity.

/// A record whose code stays fixed while its other fields change.
///
/// Snapshots and logical undo both rely on this: a record written back after an undo
/// is matched to its slot by id alone.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    fn has_id(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}

/// Index of the record carrying `id`.
pub fn position_of<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.has_id(id))
}

/// The record carrying `id`.
pub fn find_by_id<'a, E: Entity>(items: &'a [E], id: &E::Id) -> Option<&'a E> {
    items.iter().find(|item| item.has_id(id))
}
