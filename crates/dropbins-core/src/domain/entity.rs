//! Domain Layer - Core Entity Trait
//!
//! Every entity on the board carries a document-unique string id.

pub type ContainerId = String;
pub type ItemId = String;

/// Core trait for board entities
pub trait Entity {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Position of the entity with `id` in `entities`
pub(crate) fn position_of<T: Entity>(entities: &[T], id: &str) -> Option<usize> {
    entities.iter().position(|e| e.id() == id)
}
