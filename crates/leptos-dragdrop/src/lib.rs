//! Leptos DragDrop Utilities
//!
//! Native HTML5 drag-and-drop for Leptos, driven by the dropbins transfer
//! protocol. `DataTransfer` is the transport; handler factories wire
//! `dragstart`/`dragover`/`dragleave`/`drop` to the protocol, and
//! `dragend` is handled once on the document.

use dropbins_core::{CommitOutcome, DragTransport, HostBridge, TransferProtocol};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DataTransfer, DragEvent, Node};

/// Protocol shared by every handler of one board
pub type ProtocolHandle<H> = StoredValue<TransferProtocol<H>, LocalStorage>;

pub fn create_protocol_handle<H: HostBridge + 'static>(protocol: TransferProtocol<H>) -> ProtocolHandle<H> {
    StoredValue::new_local(protocol)
}

/// `DataTransfer` as a drag transport. During hover most browsers return
/// empty strings for custom formats; those read as "withheld".
pub struct DataTransferTransport {
    inner: DataTransfer,
}

impl DataTransferTransport {
    pub fn from_event(ev: &DragEvent) -> Option<Self> {
        ev.data_transfer().map(|inner| Self { inner })
    }

    pub fn set_drop_effect(&self, effect: &str) {
        self.inner.set_drop_effect(effect);
    }

    pub fn set_effect_allowed(&self, effect: &str) {
        self.inner.set_effect_allowed(effect);
    }
}

impl DragTransport for DataTransferTransport {
    fn set_data(&mut self, format: &str, value: &str) {
        if let Err(err) = self.inner.set_data(format, value) {
            tracing::warn!(format, ?err, "DataTransfer.setData rejected");
        }
    }

    fn get_data(&self, format: &str) -> Option<String> {
        self.inner.get_data(format).ok().filter(|v| !v.is_empty())
    }

    fn types(&self) -> Vec<String> {
        let types: js_sys::Array = self.inner.types();
        types
            .iter()
            .filter_map(|t: JsValue| t.as_string())
            .collect()
    }
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Candidate id of the drag in flight
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    /// Container currently showing the valid-drop cue
    pub drop_target_read: ReadSignal<Option<String>>,
    pub drop_target_write: WriteSignal<Option<String>>,
    /// Bumped after every board mutation so views re-read the board
    pub revision_read: ReadSignal<u32>,
    pub revision_write: WriteSignal<u32>,
}

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (drop_target_read, drop_target_write) = signal(None::<String>);
    let (revision_read, revision_write) = signal(0u32);
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        revision_read,
        revision_write,
    }
}

impl DndSignals {
    pub fn bump(&self) {
        self.revision_write.update(|v| *v = v.wrapping_add(1));
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.bump();
}

/// dragstart handler for an item inside `container_id`
pub fn make_on_dragstart<H: HostBridge + 'static>(
    dnd: DndSignals,
    protocol: ProtocolHandle<H>,
    item_id: String,
    container_id: String,
) -> impl Fn(DragEvent) + Clone + 'static {
    move |ev: DragEvent| {
        let Some(mut transport) = DataTransferTransport::from_event(&ev) else {
            return;
        };
        let started = protocol
            .try_update_value(|p| p.start(&item_id, &container_id, &mut transport))
            .flatten();

        match started {
            Some(started) => {
                transport.set_effect_allowed("copyMove");
                dnd.dragging_id_write.set(Some(started.candidate_id));
            }
            // Disabled origin or locked item: no drag at all
            None => ev.prevent_default(),
        }
    }
}

/// dragenter/dragover handler for a container. Accepting means calling
/// `preventDefault`, which is what lets the browser fire `drop`.
pub fn make_on_dragover<H: HostBridge + 'static>(
    dnd: DndSignals,
    protocol: ProtocolHandle<H>,
    container_id: String,
) -> impl Fn(DragEvent) + Clone + 'static {
    move |ev: DragEvent| {
        let Some(transport) = DataTransferTransport::from_event(&ev) else {
            return;
        };
        let Some((evaluation, cloning)) = protocol.try_update_value(|p| {
            let evaluation = p.evaluate(&transport, &container_id);
            (evaluation, p.session().map_or(false, |s| s.clone))
        }) else {
            return;
        };

        if evaluation.allow {
            ev.prevent_default();
            transport.set_drop_effect(if cloning { "copy" } else { "move" });
            if dnd.drop_target_read.get_untracked().as_deref() != Some(container_id.as_str()) {
                dnd.drop_target_write.set(Some(container_id.clone()));
            }
        } else {
            transport.set_drop_effect("none");
            if dnd.drop_target_read.get_untracked().as_deref() == Some(container_id.as_str()) {
                dnd.drop_target_write.set(None);
            }
        }
    }
}

/// dragleave handler for a container
pub fn make_on_dragleave<H: HostBridge + 'static>(
    dnd: DndSignals,
    protocol: ProtocolHandle<H>,
    container_id: String,
) -> impl Fn(DragEvent) + Clone + 'static {
    move |ev: DragEvent| {
        if moved_within(&ev) {
            return;
        }
        protocol.update_value(|p| p.leave(&container_id));
        if dnd.drop_target_read.get_untracked().as_deref() == Some(container_id.as_str()) {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Pointer went from the container onto one of its own descendants
fn moved_within(ev: &DragEvent) -> bool {
    let current = ev.current_target().and_then(|t| t.dyn_into::<Node>().ok());
    let related = ev.related_target().and_then(|t| t.dyn_into::<Node>().ok());
    match (current, related) {
        (Some(current), Some(related)) => current.contains(Some(&related)),
        _ => false,
    }
}

/// drop handler for a container; `on_commit` sees every commit outcome.
/// The gesture ends here: a moved or discarded item's node is gone before
/// its `dragend` could fire.
pub fn make_on_drop<H, F>(
    dnd: DndSignals,
    protocol: ProtocolHandle<H>,
    container_id: String,
    on_commit: F,
) -> impl Fn(DragEvent) + Clone + 'static
where
    H: HostBridge + 'static,
    F: Fn(CommitOutcome) + Clone + 'static,
{
    move |ev: DragEvent| {
        ev.prevent_default();
        let Some(transport) = DataTransferTransport::from_event(&ev) else {
            return;
        };
        let outcome = protocol
            .try_update_value(|p| p.complete_drop(&transport, &container_id))
            .flatten();

        end_drag(&dnd);
        if let Some(outcome) = outcome {
            on_commit(outcome);
        }
    }
}

/// dragend handler. Fires whether or not a drop happened; a no-op after a
/// drop already ended the gesture.
pub fn make_on_dragend<H: HostBridge + 'static>(
    dnd: DndSignals,
    protocol: ProtocolHandle<H>,
) -> impl Fn(DragEvent) + Clone + 'static {
    move |_ev: DragEvent| {
        if let Some(candidate) = dnd.dragging_id_read.get_untracked() {
            protocol.update_value(|p| p.cleanup(&candidate));
        }
        end_drag(&dnd);
    }
}

/// Listen for `dragend` on the document for the page lifetime, so cancelled
/// drags are cleaned up without a listener on every item
pub fn bind_document_dragend<H: HostBridge + 'static>(dnd: DndSignals, protocol: ProtocolHandle<H>) {
    let on_dragend = make_on_dragend(dnd, protocol);
    let cb = Closure::<dyn FnMut(DragEvent)>::new(move |ev: DragEvent| on_dragend(ev));
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        if let Err(err) = doc.add_event_listener_with_callback("dragend", cb.as_ref().unchecked_ref()) {
            tracing::warn!(?err, "failed to listen for dragend");
        }
    }
    cb.forget();
}
