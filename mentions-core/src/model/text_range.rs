use serde::{Deserialize, Serialize};

/// A span of text by character offset and length
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Build a range from two offsets in either order
    pub fn from_bounds(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            length: a.max(b) - a.min(b),
        }
    }

    /// A zero-length range at `offset` (a caret)
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, 0)
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Exclusive end offset, `None` when it does not fit in a `usize`
    pub fn checked_end(&self) -> Option<usize> {
        self.start.checked_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Check whether two ranges share at least one character
    pub fn intersects(&self, other: &TextRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end()
            && other.start < self.end()
    }
}
