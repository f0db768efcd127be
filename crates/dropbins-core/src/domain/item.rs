//! Item Entity
//!
//! A draggable unit owned by exactly one container. Items may be nested
//! components with their own internal nodes.

use serde::{Deserialize, Serialize};

use super::entity::{ContainerId, Entity, ItemId};

/// Grading marker left by the host's feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeMark {
    Correct,
    Incorrect,
    Hinted,
}

/// Where the item was first placed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Cloned out of a source pool
    Source,
    /// Declared in, or moved between, non-source containers
    #[default]
    Destination,
}

/// Internal node of an item (text, input, nested element...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNode {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub children: Vec<ItemNode>,
}

pub const TEXT_TAG: &str = "#text";

fn default_tag() -> String {
    "div".to_string()
}

impl ItemNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            value: None,
            content: String::new(),
            disabled: false,
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(TEXT_TAG)
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    fn set_disabled_deep(&mut self, disabled: bool) {
        self.disabled = disabled;
        for child in &mut self.children {
            child.set_disabled_deep(disabled);
        }
    }
}

/// Tag and class identity, i.e. what a shallow duplicate carries over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub tag: String,
    pub classes: Vec<String>,
    /// Registered component type, if the item is a nested component
    pub component: Option<String>,
}

impl Default for ItemIdentity {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            classes: Vec::new(),
            component: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Item {
    /// Unique within the whole board
    pub id: ItemId,
    /// For clones, the id of the item this was cloned from
    pub origin_id: Option<ItemId>,
    pub source_of_origin: Origin,
    /// Owning container
    pub owner: ContainerId,
    pub identity: ItemIdentity,
    pub draggable: bool,
    pub disabled: bool,
    pub grade: Option<GradeMark>,
    pub children: Vec<ItemNode>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, owner: impl Into<ContainerId>, identity: ItemIdentity) -> Self {
        Self {
            id: id.into(),
            origin_id: None,
            source_of_origin: Origin::default(),
            owner: owner.into(),
            identity,
            draggable: true,
            disabled: false,
            grade: None,
            children: Vec::new(),
        }
    }

    /// Shallow duplicate of `identity` under a fresh id: no subtree, no
    /// grading state.
    pub fn shallow_clone(id: impl Into<ItemId>, identity: &ItemIdentity, origin_id: &str) -> Self {
        Self {
            origin_id: Some(origin_id.to_string()),
            source_of_origin: Origin::Source,
            ..Self::new(id, ContainerId::new(), identity.clone())
        }
    }

    pub fn with_children(mut self, children: Vec<ItemNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_clone(&self) -> bool {
        self.origin_id.is_some()
    }

    /// Toggle the disabled flag through the whole subtree
    pub fn set_disabled_deep(&mut self, disabled: bool) {
        self.disabled = disabled;
        for child in &mut self.children {
            child.set_disabled_deep(disabled);
        }
    }

    pub fn clear_grade(&mut self) {
        self.grade = None;
    }

    /// Bring a freshly initialized clone in line with its origin's nodes.
    ///
    /// Equal child counts are treated as the same shape and copied by
    /// position (class, value, content); otherwise the origin's nodes are
    /// deep-copied over whatever initialization produced.
    pub fn reconcile_with(&mut self, origin: &[ItemNode]) {
        if self.children.len() == origin.len() {
            for (node, source) in self.children.iter_mut().zip(origin) {
                node.classes = source.classes.clone();
                node.value = source.value.clone();
                node.content = source.content.clone();
            }
        } else {
            self.children = origin.to_vec();
        }
    }
}

impl Entity for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(value: &str) -> ItemNode {
        ItemNode {
            value: Some(value.to_string()),
            ..ItemNode::new("input")
        }
    }

    #[test]
    fn test_shallow_clone_has_no_subtree() {
        let identity = ItemIdentity {
            tag: "span".into(),
            classes: vec!["chip".into()],
            component: None,
        };
        let clone = Item::shallow_clone("x_1", &identity, "x");
        assert_eq!(clone.identity, identity);
        assert!(clone.children.is_empty());
        assert_eq!(clone.origin_id.as_deref(), Some("x"));
        assert_eq!(clone.source_of_origin, Origin::Source);
        assert!(clone.is_clone());
    }

    #[test]
    fn test_reconcile_equal_counts_copies_by_position() {
        let mut clone = Item::new("c", "D", ItemIdentity::default())
            .with_children(vec![ItemNode::new("label"), input("")]);
        let mut label = ItemNode::new("label");
        label.classes = vec!["bold".into()];
        label.content = "Speed".into();
        let origin = vec![label, input("42")];

        clone.reconcile_with(&origin);

        // Tags come from initialization, attributes from the origin
        assert_eq!(clone.children[0].tag, "label");
        assert_eq!(clone.children[0].content, "Speed");
        assert_eq!(clone.children[0].classes, vec!["bold".to_string()]);
        assert_eq!(clone.children[1].value.as_deref(), Some("42"));
    }

    #[test]
    fn test_reconcile_different_counts_deep_copies() {
        let mut clone = Item::new("c", "D", ItemIdentity::default())
            .with_children(vec![ItemNode::new("span")]);
        let mut nested = ItemNode::new("div");
        nested.children.push(ItemNode::text("inner"));
        let origin = vec![ItemNode::text("hello"), nested];

        clone.reconcile_with(&origin);

        assert_eq!(clone.children, origin);
    }

    #[test]
    fn test_reconcile_equal_counts_keeps_initialized_tags() {
        // Same count, different shape: copied by position anyway
        let mut clone = Item::new("c", "D", ItemIdentity::default())
            .with_children(vec![ItemNode::new("button")]);
        let origin = vec![ItemNode::text("label")];

        clone.reconcile_with(&origin);

        assert_eq!(clone.children[0].tag, "button");
        assert_eq!(clone.children[0].content, "label");
    }

    #[test]
    fn test_set_disabled_deep() {
        let mut nested = ItemNode::new("div");
        nested.children.push(input("1"));
        let mut item = Item::new("i", "S", ItemIdentity::default()).with_children(vec![nested]);

        item.set_disabled_deep(true);
        assert!(item.disabled);
        assert!(item.children[0].disabled);
        assert!(item.children[0].children[0].disabled);

        item.set_disabled_deep(false);
        assert!(!item.children[0].children[0].disabled);
    }
}
