//! Container Panel Component
//!
//! One container of the board. The panel is the drop target; its items
//! are the drag sources.

use dropbins_core::{CommitOutcome, Purpose};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_dragleave, make_on_dragover, make_on_drop};

use crate::components::ItemCard;
use crate::context::AppContext;
use crate::models::{container_caption, container_class};
use crate::store::{store_add_evicting, store_remove_evicting, use_app_store, AppStateStoreFields};

/// Length of the removal transition of evicted items
const EVICT_TRANSITION_MS: u32 = 300;

#[component]
pub fn ContainerPanel(container_id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let dnd = ctx.dnd;

    let snapshot = {
        let container_id = container_id.clone();
        Memo::new(move |_| {
            store
                .board()
                .get()
                .containers
                .into_iter()
                .find(|c| c.id == container_id)
        })
    };

    let on_commit = move |outcome: CommitOutcome| match outcome {
        CommitOutcome::Placed { evicted: Some(evicted), .. } => {
            let evicted_id = evicted.id.clone();
            store_add_evicting(&store, evicted);
            spawn_local(async move {
                TimeoutFuture::new(EVICT_TRANSITION_MS).await;
                store_remove_evicting(&store, &evicted_id);
            });
        }
        CommitOutcome::Placed { degraded: true, item_id, .. } => {
            web_sys::console::log_1(&format!("[DND] {} placed without its origin's state", item_id).into());
        }
        CommitOutcome::Rejected(reason) => {
            web_sys::console::log_1(&format!("[DND] Drop rejected: {}", reason).into());
        }
        _ => {}
    };

    let on_dragover = make_on_dragover(dnd, ctx.protocol, container_id.clone());
    let on_dragleave = make_on_dragleave(dnd, ctx.protocol, container_id.clone());
    let on_drop = make_on_drop(dnd, ctx.protocol, container_id.clone(), on_commit);

    let is_target = {
        let container_id = container_id.clone();
        move || dnd.drop_target_read.get().as_deref() == Some(container_id.as_str())
    };

    // Only the class reacts to hover cues; items re-render when they change
    let class = move || {
        snapshot.with(|c| c.as_ref().map(|c| container_class(c, is_target())).unwrap_or_default())
    };
    let caption = move || snapshot.with(|c| c.as_ref().map(container_caption).unwrap_or_default());
    let group = move || snapshot.with(|c| c.as_ref().map(|c| c.group.clone()).unwrap_or_default());
    let items = Memo::new(move |_| snapshot.get().map(|c| (c.purpose, c.items)));

    let evicting = {
        let container_id = container_id.clone();
        move || {
            store
                .evicting()
                .get()
                .into_iter()
                .filter(|item| item.owner == container_id)
                .collect::<Vec<_>>()
        }
    };

    let owner = container_id;
    view! {
        <section
            class=class
            data-group=group
            on:dragenter=on_dragover.clone()
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop
        >
            <h2 class="container-caption">{caption}</h2>
            <div class="container-items">
                {move || {
                    let Some((purpose, items)) = items.get() else {
                        return Vec::new();
                    };
                    let removable = purpose != Purpose::Source;
                    items
                        .into_iter()
                        .map(|item| view! { <ItemCard item=item container_id=owner.clone() removable=removable /> })
                        .collect::<Vec<_>>()
                }}
                {move || evicting()
                    .into_iter()
                    .map(|item| view! { <div class="item-card evicting">{item.id}</div> })
                    .collect_view()}
            </div>
        </section>
    }
}
