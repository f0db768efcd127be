//! Domain Layer
//!
//! Containers, items and the board that owns them.
//! No knowledge of drag transports or hosts beyond the bridge trait.

mod board;
mod container;
mod entity;
mod item;

pub use board::{Board, BoardSnapshot, ContainerSnapshot, ItemSnapshot};
pub use container::{Container, Purpose};
pub use entity::{ContainerId, Entity, ItemId};
pub use item::{GradeMark, Item, ItemIdentity, ItemNode, Origin, TEXT_TAG};
