//! Container Entity
//!
//! A drop region. Containers only exchange items within their group.

use serde::{Deserialize, Serialize};

use super::entity::{ContainerId, Entity, ItemId};

/// What a container does with items dropped into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Pool of templates; dragging out clones, nothing may be dropped in
    Source,
    /// Answer bin; drops are recorded with the host
    #[default]
    Destination,
    /// Anything dropped here is deleted
    Trashcan,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Source => "source",
            Purpose::Destination => "destination",
            Purpose::Trashcan => "trashcan",
        }
    }

    /// Markup attribute value, case-insensitive. Unknown values fall back
    /// to destination.
    pub fn from_attr(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Purpose::Source,
            "trashcan" => Purpose::Trashcan,
            _ => Purpose::Destination,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Container {
    /// Unique identifier
    pub id: ContainerId,
    /// Partition key; transfers only happen between equal groups
    pub group: String,
    pub purpose: Purpose,
    /// Drops are refused once `children.len()` reaches this
    pub cardinality_limit: Option<usize>,
    /// After an accepted drop, the oldest child is evicted past this
    pub overflow_limit: Option<usize>,
    /// Insertion order, oldest first
    pub children: Vec<ItemId>,
    pub enabled: bool,
    /// Visual valid-drop cue
    pub drop_candidate: bool,
}

impl Container {
    pub fn new(id: impl Into<ContainerId>, group: impl Into<String>, purpose: Purpose) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            purpose,
            cardinality_limit: None,
            overflow_limit: None,
            children: Vec::new(),
            enabled: true,
            drop_candidate: false,
        }
    }

    pub fn with_cardinality(mut self, limit: usize) -> Self {
        self.cardinality_limit = Some(limit);
        self
    }

    pub fn with_overflow(mut self, limit: usize) -> Self {
        self.overflow_limit = Some(limit);
        self
    }

    /// True once the cardinality limit is reached
    pub fn is_full(&self) -> bool {
        self.cardinality_limit
            .map_or(false, |limit| self.children.len() >= limit)
    }

    /// True when the overflow limit is exceeded
    pub fn is_overflowing(&self) -> bool {
        self.overflow_limit
            .map_or(false, |limit| self.children.len() > limit)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.children.iter().any(|c| c == item_id)
    }
}

impl Entity for Container {
    fn id(&self) -> &str {
        &self.id
    }
}
