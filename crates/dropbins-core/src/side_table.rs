//! Drag Side-Table
//!
//! Correlation map from `hash(candidate_id)` to in-flight drag metadata.
//! Some drag transports only expose type tags during hover; the tag carries
//! the hash and this table carries the rest. Owned by the protocol.

use std::collections::HashMap;

/// Metadata registered at drag start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideEntry {
    /// Candidate id the gesture negotiates under
    pub id: String,
    pub group: String,
    pub origin_container_id: String,
}

#[derive(Debug, Default)]
pub struct DragSideTable {
    entries: HashMap<i32, SideEntry>,
}

impl DragSideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Last writer wins; a stale entry from an
    /// abandoned drag is replaced silently.
    pub fn begin(&mut self, hash: i32, id: &str, group: &str, origin_container_id: &str) {
        let entry = SideEntry {
            id: id.to_string(),
            group: group.to_string(),
            origin_container_id: origin_container_id.to_string(),
        };
        if let Some(previous) = self.entries.insert(hash, entry) {
            tracing::debug!(hash, stale = %previous.id, "side-table entry overwritten");
        }
    }

    pub fn lookup(&self, hash: i32) -> Option<&SideEntry> {
        self.entries.get(&hash)
    }

    /// Remove if present
    pub fn end(&mut self, hash: i32) {
        self.entries.remove(&hash);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_lookup_end() {
        let mut table = DragSideTable::new();
        table.begin(42, "x_1", "g1", "S");

        let entry = table.lookup(42).expect("entry");
        assert_eq!(entry.id, "x_1");
        assert_eq!(entry.group, "g1");
        assert_eq!(entry.origin_container_id, "S");

        table.end(42);
        assert!(table.lookup(42).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_last_writer_wins() {
        let mut table = DragSideTable::new();
        table.begin(7, "old", "g1", "A");
        table.begin(7, "new", "g2", "B");

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(7).map(|e| e.id.as_str()), Some("new"));
    }

    #[test]
    fn test_end_missing_is_noop() {
        let mut table = DragSideTable::new();
        table.end(1);
        table.end(1);
        assert!(table.is_empty());
    }
}
