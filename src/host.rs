//! Web Host Bridge
//!
//! Frontend bindings to the tutoring engine exposed as `window.dropbinsHost`.
//! Every call is optional: a page without the object still works, actions
//! are then only logged.

use std::collections::{HashMap, VecDeque};

use dropbins_core::{ActionRecord, HostBridge, Item, ItemNode, ItemSnapshot, Verdict};
use serde::Deserialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::AppContext;
use leptos::prelude::UpdateValue;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["window", "dropbinsHost"], js_name = isEnabled)]
    fn host_is_enabled(id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "dropbinsHost"], js_name = recordAction)]
    fn host_record_action(record: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "dropbinsHost"], js_name = initializeComponent)]
    fn host_initialize_component(item: JsValue, component_type: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "dropbinsHost"], js_name = defaultFeedback)]
    fn host_default_feedback(record: JsValue, verdict: &str) -> Result<JsValue, JsValue>;
}

pub const FEEDBACK_EVENT: &str = "dropbins-feedback";
pub const SET_ENABLED_EVENT: &str = "dropbins-set-enabled";
pub const EXPORT_EVENT: &str = "dropbins-export";

/// Actions kept for the action log; older ones are dropped
pub const ACTION_HISTORY: usize = 200;

/// Host backed by `window.dropbinsHost` plus the page's component shapes
#[derive(Debug, Default)]
pub struct WebHost {
    components: HashMap<String, Vec<ItemNode>>,
    /// Most recent actions, newest last
    actions: VecDeque<ActionRecord>,
}

impl WebHost {
    pub fn new(components: HashMap<String, Vec<ItemNode>>) -> Self {
        Self {
            components,
            actions: VecDeque::with_capacity(ACTION_HISTORY),
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter()
    }

    fn remember(&mut self, record: &ActionRecord) {
        if self.actions.len() == ACTION_HISTORY {
            self.actions.pop_front();
        }
        self.actions.push_back(record.clone());
    }
}

impl HostBridge for WebHost {
    fn is_enabled(&self, id: &str) -> bool {
        // Missing host or a non-boolean answer counts as enabled
        host_is_enabled(id)
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    fn record_action(&mut self, record: &ActionRecord) {
        tracing::info!(selection = %record.selection, action = %record.action, input = %record.input, "action recorded");
        self.remember(record);

        match serde_wasm_bindgen::to_value(record) {
            Ok(value) => {
                if let Err(e) = host_record_action(value) {
                    tracing::debug!(?e, "recordAction unavailable");
                }
            }
            Err(e) => tracing::warn!(%e, "failed to serialize action"),
        }
    }

    fn is_component(&self, component_type: &str) -> bool {
        self.components.contains_key(component_type)
    }

    fn default_children(&self, component_type: &str) -> Vec<ItemNode> {
        self.components.get(component_type).cloned().unwrap_or_default()
    }

    fn initialize_component(&mut self, item: &mut Item, component_type: &str) {
        let Ok(value) = serde_wasm_bindgen::to_value(&ItemSnapshot::from(&*item)) else {
            return;
        };
        // The host may hand back replacement internals
        match host_initialize_component(value, component_type) {
            Ok(result) if !result.is_undefined() && !result.is_null() => {
                match serde_wasm_bindgen::from_value::<Vec<ItemNode>>(result) {
                    Ok(children) => item.children = children,
                    Err(e) => tracing::warn!(item = %item.id, %e, "ignored component internals"),
                }
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(item = %item.id, ?e, "initializeComponent unavailable"),
        }
    }

    fn default_feedback(&mut self, record: &ActionRecord, verdict: Verdict) {
        let verdict = match verdict {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
        };
        if let Ok(value) = serde_wasm_bindgen::to_value(record) {
            if let Err(e) = host_default_feedback(value, verdict) {
                tracing::debug!(?e, "defaultFeedback unavailable");
            }
        }
    }
}

/// `detail` of a `dropbins-feedback` event
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackDetail {
    #[serde(flatten)]
    pub record: ActionRecord,
    pub verdict: Verdict,
}

/// `detail` of a `dropbins-set-enabled` event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEnabledDetail {
    pub container_id: String,
    pub enabled: bool,
}

fn add_window_listener(event: &str, handler: impl FnMut(web_sys::CustomEvent) + 'static) {
    let cb = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(handler);
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
            tracing::warn!(event, ?e, "failed to add listener");
        }
    }
    cb.forget();
}

/// Listen for host-dispatched events on `window` for the page lifetime
pub fn bind_host_listeners(ctx: AppContext) {
    add_window_listener(FEEDBACK_EVENT, move |ev| {
        match serde_wasm_bindgen::from_value::<FeedbackDetail>(ev.detail()) {
            Ok(detail) => {
                let outcome = ctx
                    .protocol
                    .try_update_value(|p| p.apply_feedback(&detail.record, detail.verdict));
                tracing::debug!(?outcome, "feedback applied");
                ctx.reload();
            }
            Err(e) => tracing::warn!(%e, "malformed feedback event"),
        }
    });

    add_window_listener(SET_ENABLED_EVENT, move |ev| {
        match serde_wasm_bindgen::from_value::<SetEnabledDetail>(ev.detail()) {
            Ok(detail) => {
                ctx.protocol
                    .update_value(|p| p.set_enabled(&detail.container_id, detail.enabled));
                ctx.reload();
            }
            Err(e) => tracing::warn!(%e, "malformed set-enabled event"),
        }
    });

    add_window_listener(EXPORT_EVENT, move |_ev| {
        ctx.protocol.update_value(|p| p.export_configuration());
        ctx.reload();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_feedback_detail_flattens_record() {
        let detail: FeedbackDetail = serde_json::from_str(
            r#"{ "selection": "answer", "action": "Add", "input": "two_dbc1", "verdict": "correct" }"#,
        )
        .unwrap();
        assert_eq!(detail.record, ActionRecord::new("answer", "Add", "two_dbc1"));
        assert_eq!(detail.verdict, Verdict::Correct);
    }

    #[test]
    fn test_set_enabled_detail() {
        let detail: SetEnabledDetail =
            serde_json::from_str(r#"{ "containerId": "pool", "enabled": false }"#).unwrap();
        assert_eq!(detail.container_id, "pool");
        assert!(!detail.enabled);
    }

    #[test]
    fn test_components_registry() {
        let mut components = HashMap::new();
        components.insert("counter".to_string(), vec![ItemNode::new("input")]);
        let host = WebHost::new(components);
        assert!(host.is_component("counter"));
        assert!(!host.is_component("slider"));
        assert_eq!(host.default_children("counter").len(), 1);
        assert!(host.default_children("slider").is_empty());
    }

    #[test]
    fn test_action_history_is_capped() {
        let mut host = WebHost::default();
        for i in 0..ACTION_HISTORY + 5 {
            host.remember(&ActionRecord::new("answer", "Add", i.to_string()));
        }
        let inputs: Vec<&str> = host.actions().map(|a| a.input.as_str()).collect();
        assert_eq!(inputs.len(), ACTION_HISTORY);
        assert_eq!(inputs[0], "5");
        assert_eq!(inputs.last().copied(), Some((ACTION_HISTORY + 4).to_string().as_str()));
    }
}
