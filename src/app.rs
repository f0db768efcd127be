//! Dropbins Frontend App
//!
//! Builds the transfer protocol from the page configuration and lays out
//! the board: containers on the left, the action log on the right.

use dropbins_core::{SequentialIds, TransferProtocol};
use leptos::prelude::*;
use leptos_dragdrop::{bind_document_dragend, create_dnd_signals, create_protocol_handle};
use reactive_stores::Store;

use crate::components::{ActionLog, ContainerPanel};
use crate::config::load_page_config;
use crate::context::AppContext;
use crate::host::{bind_host_listeners, WebHost};
use crate::store::{store_refresh, AppState, AppStateStoreFields};

/// Prefix of generated ids (items without one, clone suffixes)
const ID_PREFIX: &str = "dbc";

#[component]
pub fn App() -> impl IntoView {
    let protocol = load_page_config().and_then(|page| {
        let host = WebHost::new(page.components);
        TransferProtocol::new(&page.board, host, Box::new(SequentialIds::new(ID_PREFIX)))
            .map_err(|e| e.to_string())
    });

    match protocol {
        Ok(protocol) => view! { <Board protocol=protocol /> }.into_any(),
        Err(msg) => {
            if let Err(e) = rolling_logger::error(&format!("board not created: {}", msg)) {
                web_sys::console::warn_1(&format!("[APP] {}: {}", e, msg).into());
            }
            view! {
                <div class="board-error">
                    <h1>"Dropbins"</h1>
                    <p>{msg}</p>
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn Board(protocol: TransferProtocol<WebHost>) -> impl IntoView {
    let _ = rolling_logger::info(&format!("board ready with {} containers", protocol.board().containers().len()));
    let protocol = create_protocol_handle(protocol);
    let dnd = create_dnd_signals();
    let ctx = AppContext::new(protocol, dnd);
    let store = Store::new(AppState::default());

    // Provide context to all children
    provide_context(ctx);
    provide_context(store);
    bind_host_listeners(ctx);
    bind_document_dragend(dnd, protocol);

    // Re-read the board after every mutation
    Effect::new(move |_| {
        let revision = dnd.revision_read.get();
        web_sys::console::log_1(&format!("[APP] Board revision {}", revision).into());
        store_refresh(&store, protocol);
    });

    let container_ids = Memo::new(move |_| {
        store
            .board()
            .get()
            .containers
            .into_iter()
            .map(|c| c.id)
            .collect::<Vec<_>>()
    });

    view! {
        <div class="app-layout">
            <main class="board">
                <h1>"Dropbins"</h1>
                <For
                    each=move || container_ids.get()
                    key=|id| id.clone()
                    children=move |id| view! { <ContainerPanel container_id=id /> }
                />
            </main>
            <ActionLog />
        </div>
    }
}
