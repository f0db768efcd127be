//! Drag Transport
//!
//! The data channel that travels with a native drag gesture. Platforms
//! disagree on what is readable during hover: some expose every value,
//! others only the list of type tags until the final drop.

use std::collections::BTreeMap;

/// Primary payload: the candidate id
pub const FORMAT_PRIMARY: &str = "text/plain";
/// Group name of the origin container
pub const FORMAT_GROUP: &str = "dropbins/group";
/// Id of the origin container
pub const FORMAT_ORIGIN_CONTAINER: &str = "dropbins/origin";
/// Id of the dragged item (the clone source for source-pool drags)
pub const FORMAT_ORIGINAL: &str = "dropbins/original";
/// Side-channel marker prefix, followed by the candidate hash
pub const TAG_PREFIX: &str = "protocolTag/";

/// Side-channel key for a candidate hash
pub fn tag_key(hash: i32) -> String {
    format!("{}{}", TAG_PREFIX, hash)
}

/// Extract the hash from a side-channel marker type tag
pub fn parse_tag_key(tag: &str) -> Option<i32> {
    let prefix = tag.get(..TAG_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(TAG_PREFIX) {
        return None;
    }
    tag[TAG_PREFIX.len()..].parse().ok()
}

pub trait DragTransport {
    fn set_data(&mut self, format: &str, value: &str);

    /// `None` when the platform withholds the value (commonly during hover)
    fn get_data(&self, format: &str) -> Option<String>;

    /// Type tags currently on the transport; always readable
    fn types(&self) -> Vec<String>;

    fn has_type(&self, format: &str) -> bool {
        self.types().iter().any(|t| t.eq_ignore_ascii_case(format))
    }
}

/// In-memory transport. With `protected` set, values are hidden and only
/// type tags are visible, like hover events on restrictive platforms.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    data: BTreeMap<String, String>,
    protected: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same data, values hidden
    pub fn protected_view(&self) -> Self {
        Self { data: self.data.clone(), protected: true }
    }

    /// Same data, values readable (the drop event)
    pub fn drop_view(&self) -> Self {
        Self { data: self.data.clone(), protected: false }
    }
}

impl DragTransport for MemoryTransport {
    fn set_data(&mut self, format: &str, value: &str) {
        // Platforms lowercase type tags
        self.data.insert(format.to_ascii_lowercase(), value.to_string());
    }

    fn get_data(&self, format: &str) -> Option<String> {
        if self.protected {
            return None;
        }
        self.data.get(&format.to_ascii_lowercase()).cloned()
    }

    fn types(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_key_roundtrip_with_negative_hash() {
        let key = tag_key(-1234);
        assert_eq!(key, "protocolTag/-1234");
        assert_eq!(parse_tag_key(&key), Some(-1234));
        assert_eq!(parse_tag_key("protocoltag/99"), Some(99));
        assert_eq!(parse_tag_key("text/plain"), None);
        assert_eq!(parse_tag_key("protocoltag/abc"), None);
    }

    #[test]
    fn test_protected_view_hides_values_not_types() {
        let mut t = MemoryTransport::new();
        t.set_data(FORMAT_GROUP, "g1");
        t.set_data(FORMAT_PRIMARY, "x");

        let hover = t.protected_view();
        assert_eq!(hover.get_data(FORMAT_GROUP), None);
        assert!(hover.has_type(FORMAT_GROUP));

        let drop = hover.drop_view();
        assert_eq!(drop.get_data(FORMAT_PRIMARY).as_deref(), Some("x"));
    }
}
