//! Host Bridge
//!
//! The tutoring engine the protocol reports to. Grading, tab order and
//! component registration live on the other side of this trait.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemNode};

pub const ACTION_ADD: &str = "Add";
pub const ACTION_SET_CHILDREN: &str = "SetChildren";

/// Selection-action-input triple consumed by the grading pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub selection: String,
    pub action: String,
    pub input: String,
}

impl ActionRecord {
    pub fn new(selection: impl Into<String>, action: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            action: action.into(),
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

pub trait HostBridge {
    /// Host-side enablement of a container or item
    fn is_enabled(&self, _id: &str) -> bool {
        true
    }

    fn record_action(&mut self, record: &ActionRecord);

    /// Whether `component_type` names a registered nested component
    fn is_component(&self, _component_type: &str) -> bool {
        false
    }

    /// Internal nodes a fresh instance of `component_type` starts with
    fn default_children(&self, _component_type: &str) -> Vec<ItemNode> {
        Vec::new()
    }

    /// (Re)initialize a nested component so it is independently interactive
    fn initialize_component(&mut self, _item: &mut Item, _component_type: &str) {}

    /// Feedback for actions the protocol does not handle itself
    fn default_feedback(&mut self, _record: &ActionRecord, _verdict: Verdict) {}
}

/// A call observed by `RecordingHost`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Action(ActionRecord),
    Initialize { item_id: String, component_type: String },
    DefaultFeedback(ActionRecord, Verdict),
}

/// In-memory host that records every call. Used by tests and by
/// embeddings without a grading engine.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<RecordedCall>,
    disabled: HashSet<String>,
    components: HashMap<String, Vec<ItemNode>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type and the nodes a fresh instance has
    pub fn register_component(&mut self, component_type: &str, shape: Vec<ItemNode>) {
        self.components.insert(component_type.to_string(), shape);
    }

    pub fn set_host_enabled(&mut self, id: &str, enabled: bool) {
        if enabled {
            self.disabled.remove(id);
        } else {
            self.disabled.insert(id.to_string());
        }
    }

    pub fn actions(&self) -> Vec<&ActionRecord> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Action(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn initialized(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Initialize { item_id, .. } => Some(item_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl HostBridge for RecordingHost {
    fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.contains(id)
    }

    fn record_action(&mut self, record: &ActionRecord) {
        self.calls.push(RecordedCall::Action(record.clone()));
    }

    fn is_component(&self, component_type: &str) -> bool {
        self.components.contains_key(component_type)
    }

    fn default_children(&self, component_type: &str) -> Vec<ItemNode> {
        self.components.get(component_type).cloned().unwrap_or_default()
    }

    fn initialize_component(&mut self, item: &mut Item, component_type: &str) {
        self.calls.push(RecordedCall::Initialize {
            item_id: item.id.clone(),
            component_type: component_type.to_string(),
        });
    }

    fn default_feedback(&mut self, record: &ActionRecord, verdict: Verdict) {
        self.calls.push(RecordedCall::DefaultFeedback(record.clone(), verdict));
    }
}
