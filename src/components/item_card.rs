//! Item Card Component
//!
//! A draggable item and its internal nodes.

use dropbins_core::{ItemNode, ItemSnapshot};
use leptos::prelude::*;
use leptos_dragdrop::make_on_dragstart;

use crate::context::AppContext;
use crate::markdown::parse_markdown_inline;
use crate::models::{is_dragging_item, item_class};

#[component]
pub fn ItemCard(
    item: ItemSnapshot,
    container_id: String,
    /// Show the remove button (never in a source)
    #[prop(default = false)]
    removable: bool,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = ctx.dnd;

    let item_id = item.id.clone();
    let on_dragstart = make_on_dragstart(dnd, ctx.protocol, item_id.clone(), container_id);

    let class = {
        let item = item.clone();
        move || {
            let dragging = dnd.dragging_id_read.get();
            let original = dragging.as_ref().and_then(|_| {
                ctx.protocol
                    .try_with_value(|p| p.session().map(|s| s.original_id.clone()))
                    .flatten()
            });
            item_class(&item, is_dragging_item(&item.id, dragging.as_deref(), original.as_deref()))
        }
    };

    let on_remove = {
        let item_id = item_id.clone();
        move |_| {
            ctx.protocol.update_value(|p| {
                if let Err(e) = p.board_mut().remove_item(&item_id) {
                    tracing::warn!(%e, "remove ignored");
                }
            });
            ctx.reload();
        }
    };

    let nodes = item
        .children
        .iter()
        .enumerate()
        .map(|(i, node)| render_node(ctx, &item_id, vec![i], node, item.disabled))
        .collect_view();

    view! {
        <div
            class=class
            id=item_id.clone()
            draggable=if item.draggable { "true" } else { "false" }
            on:dragstart=on_dragstart
        >
            {nodes}
            {removable.then(|| view! {
                <button class="item-remove" title="Remove" on:click=on_remove>"×"</button>
            })}
        </div>
    }
}

/// Render one internal node; `path` indexes it from the item's children
fn render_node(ctx: AppContext, item_id: &str, path: Vec<usize>, node: &ItemNode, locked: bool) -> AnyView {
    if node.is_text() {
        return view! { <span class="item-text" inner_html=parse_markdown_inline(&node.content) /> }.into_any();
    }

    let class = node.classes.join(" ");
    if node.tag == "input" {
        let item_id = item_id.to_string();
        let on_input = move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            ctx.protocol.update_value(|p| {
                if let Some(target) = p.board_mut().item_mut(&item_id).and_then(|i| node_at(&mut i.children, &path)) {
                    target.value = Some(value);
                }
            });
        };
        return view! {
            <input
                class=class
                prop:value=node.value.clone().unwrap_or_default()
                disabled=locked || node.disabled
                on:input=on_input
            />
        }
        .into_any();
    }

    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let mut child_path = path.clone();
            child_path.push(i);
            render_node(ctx, item_id, child_path, child, locked)
        })
        .collect_view();

    view! {
        <div class=class data-tag=node.tag.clone()>
            {(!node.content.is_empty()).then(|| node.content.clone())}
            {children}
        </div>
    }
    .into_any()
}

/// Node at `path` inside `children`
pub(crate) fn node_at<'a>(children: &'a mut [ItemNode], path: &[usize]) -> Option<&'a mut ItemNode> {
    let (first, rest) = path.split_first()?;
    let node = children.get_mut(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at(&mut node.children, rest)
    }
}
