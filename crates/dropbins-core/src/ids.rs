//! Id Generation
//!
//! Mints item ids at initialization and candidate-id suffixes at drag start.

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// `prefix` followed by a monotonically increasing counter
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 1 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("db")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
