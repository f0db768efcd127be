//! Board Configuration
//!
//! Declarations as they appear in markup attributes, deserialized from
//! camelCase JSON. Limits accept strings or numbers; negative or
//! unparseable values mean "unbounded".

use serde::{Deserialize, Serialize};

use crate::domain::ItemNode;

/// Group used by containers that do not declare one
pub const DEFAULT_GROUP: &str = "dropbins-default-group";

fn default_separator() -> String {
    "_".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tag() -> String {
    "div".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(default)]
    pub default_group: Option<String>,
    /// Keep items graded correct non-draggable
    #[serde(default)]
    pub lock_on_correct: bool,
    /// Joins an item id and the generated suffix of a clone candidate
    #[serde(default = "default_separator")]
    pub id_separator: String,
    #[serde(default)]
    pub containers: Vec<ContainerDecl>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_group: None,
            lock_on_correct: false,
            id_separator: default_separator(),
            containers: Vec::new(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn group_or_default<'a>(&'a self, decl: &'a ContainerDecl) -> &'a str {
        decl.group
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .or(self.default_group.as_deref())
            .unwrap_or(DEFAULT_GROUP)
    }
}

/// A limit attribute, written either as `"3"` or `3`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitAttr {
    Number(i64),
    Text(String),
}

impl LimitAttr {
    pub fn resolve(&self) -> Option<usize> {
        match self {
            LimitAttr::Number(n) => usize::try_from(*n).ok(),
            LimitAttr::Text(s) => parse_limit(s),
        }
    }
}

/// Parse a limit attribute. Absent, negative or garbage means unbounded.
pub fn parse_limit(raw: &str) -> Option<usize> {
    let n: i64 = raw.trim().parse().ok()?;
    usize::try_from(n).ok()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDecl {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    /// `source` | `destination` | `trashcan`
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub cardinality_limit: Option<LimitAttr>,
    #[serde(default)]
    pub overflow_limit: Option<LimitAttr>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<ItemDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDecl {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Registered component type for nested stateful items
    #[serde(default)]
    pub component: Option<String>,
    /// Text shown inside the item; becomes its first text node
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub children: Vec<ItemNode>,
}

impl Default for ContainerDecl {
    fn default() -> Self {
        Self {
            id: None,
            group: None,
            purpose: None,
            cardinality_limit: None,
            overflow_limit: None,
            enabled: true,
            items: Vec::new(),
        }
    }
}

impl Default for ItemDecl {
    fn default() -> Self {
        Self {
            id: None,
            tag: default_tag(),
            classes: Vec::new(),
            component: None,
            content: String::new(),
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("3"), Some(3));
        assert_eq!(parse_limit(" 0 "), Some(0));
        assert_eq!(parse_limit("-1"), None);
        assert_eq!(parse_limit(""), None);
        assert_eq!(parse_limit("two"), None);
    }

    #[test]
    fn test_from_json() {
        let config = BoardConfig::from_json(
            r#"{
                "lockOnCorrect": true,
                "containers": [
                    { "id": "S", "group": "g1", "purpose": "source",
                      "items": [ { "id": "x", "content": "X" } ] },
                    { "id": "D", "group": "g1", "cardinalityLimit": "2", "overflowLimit": 5 },
                    { "id": "T", "purpose": "trashcan", "cardinalityLimit": -1 }
                ]
            }"#,
        )
        .expect("valid config");

        assert!(config.lock_on_correct);
        assert_eq!(config.id_separator, "_");
        assert_eq!(config.containers.len(), 3);
        assert_eq!(config.containers[0].items[0].tag, "div");
        assert_eq!(config.containers[1].cardinality_limit.as_ref().and_then(LimitAttr::resolve), Some(2));
        assert_eq!(config.containers[1].overflow_limit.as_ref().and_then(LimitAttr::resolve), Some(5));
        assert_eq!(config.containers[2].cardinality_limit.as_ref().and_then(LimitAttr::resolve), None);
        assert!(config.containers[2].enabled);
        assert_eq!(config.group_or_default(&config.containers[2]), DEFAULT_GROUP);
    }
}
