//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use dropbins_core::{BoardSnapshot, ItemSnapshot};
use leptos_dragdrop::ProtocolHandle;

use crate::host::WebHost;

/// Render state derived from the protocol's board
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Latest board snapshot
    pub board: BoardSnapshot,
    /// Items already evicted by an overflow limit, still fading out
    pub evicting: Vec<ItemSnapshot>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Re-read the board from the protocol
pub fn store_refresh(store: &AppStore, protocol: ProtocolHandle<WebHost>) {
    if let Some(snapshot) = protocol.try_with_value(|p| p.snapshot()) {
        store.board().set(snapshot);
    }
}

/// Keep an evicted item on screen for its removal transition
pub fn store_add_evicting(store: &AppStore, item: ItemSnapshot) {
    store.evicting().write().push(item);
}

/// Drop an evicted item once its transition finished
pub fn store_remove_evicting(store: &AppStore, item_id: &str) {
    store.evicting().write().retain(|item| item.id != item_id);
}
