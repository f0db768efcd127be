//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos_dragdrop::{DndSignals, ProtocolHandle};

use crate::host::WebHost;

/// Board-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// The transfer protocol owning the board
    pub protocol: ProtocolHandle<WebHost>,
    /// Drag state and the board revision counter
    pub dnd: DndSignals,
}

impl AppContext {
    pub fn new(protocol: ProtocolHandle<WebHost>, dnd: DndSignals) -> Self {
        Self { protocol, dnd }
    }

    /// Signal that the board changed outside a drag gesture
    pub fn reload(&self) {
        self.dnd.bump();
    }
}
