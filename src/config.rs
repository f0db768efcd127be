//! Page Configuration
//!
//! The board is declared in a `<script type="application/json"
//! id="dropbins-config">` element. Pages without one get a small demo board.

use std::collections::HashMap;

use dropbins_core::{BoardConfig, ItemNode};
use serde::Deserialize;
use wasm_bindgen::JsCast;

pub const CONFIG_ELEMENT_ID: &str = "dropbins-config";

const DEMO_CONFIG: &str = r#"{
  "lockOnCorrect": true,
  "components": {
    "counter": [{ "tag": "input", "classes": ["counter-value"], "value": "0" }]
  },
  "containers": [
    {
      "id": "pool",
      "group": "g1",
      "purpose": "source",
      "items": [
        { "id": "two", "content": "%b%2%b%" },
        { "id": "plus", "content": "**+**" },
        { "id": "four", "content": "%g%4%g%" },
        { "id": "count", "component": "counter" }
      ]
    },
    { "id": "answer", "group": "g1", "purpose": "destination", "cardinalityLimit": "3" },
    { "id": "scratch", "group": "g1", "purpose": "destination", "overflowLimit": 2 },
    { "id": "trash", "group": "g1", "purpose": "trashcan" }
  ]
}"#;

/// Board declaration plus the component shapes registered by the page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(flatten)]
    pub board: BoardConfig,
    /// Default internal nodes per component type
    #[serde(default)]
    pub components: HashMap<String, Vec<ItemNode>>,
}

pub fn parse_page_config(json: &str) -> Result<PageConfig, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid board configuration: {}", e))
}

/// Read the page configuration from the DOM, falling back to the demo board
pub fn load_page_config() -> Result<PageConfig, String> {
    let script = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.dyn_into::<web_sys::HtmlScriptElement>().ok());

    match script {
        Some(script) => parse_page_config(&script.text().map_err(|e| format!("{:?}", e))?),
        None => {
            tracing::info!("no #{} element, loading demo board", CONFIG_ELEMENT_ID);
            parse_page_config(DEMO_CONFIG)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_config_parses() {
        let page = parse_page_config(DEMO_CONFIG).unwrap();
        assert!(page.board.lock_on_correct);
        assert_eq!(page.board.id_separator, "_");
        assert_eq!(page.board.containers.len(), 4);
        assert_eq!(page.components["counter"][0].value.as_deref(), Some("0"));
    }

    #[test]
    fn test_components_optional() {
        let page = parse_page_config(r#"{ "containers": [] }"#).unwrap();
        assert!(page.components.is_empty());
        assert!(page.board.containers.is_empty());
    }

    #[test]
    fn test_invalid_config_reports() {
        let err = parse_page_config("{ \"containers\": 3 }").unwrap_err();
        assert!(err.starts_with("Invalid board configuration"));
    }
}
