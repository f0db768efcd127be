//! UI Components
//!
//! Leptos components of the board.

mod action_log;
mod container_panel;
mod item_card;

pub use action_log::ActionLog;
pub use container_panel::ContainerPanel;
pub use item_card::ItemCard;
