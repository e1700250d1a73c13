//! Range bookkeeping for text edits.
//!
//! An [`Edit`] replaces `old_len` characters at `start` with `new_len` new
//! ones. [`adjust`] maps every tracked mention across it: mentions before
//! the edit shift, mentions after it stay put, and any mention whose text the
//! edit touches is dropped.

use tracing::trace;

use crate::model::{MentionRange, TextRange};
use crate::text::char_len;

/// A single replacement in character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub old_len: usize,
    pub new_len: usize,
}

impl Edit {
    pub fn new(start: usize, old_len: usize, new_len: usize) -> Self {
        Self {
            start,
            old_len,
            new_len,
        }
    }

    /// The edit that replaces `range` with `replacement`
    pub fn replace(range: TextRange, replacement: &str) -> Self {
        Self::new(range.start, range.length, char_len(replacement))
    }

    /// Smallest single edit turning `old` into `new`.
    ///
    /// Trims the common prefix, then the common suffix of what remains.
    pub fn between(old: &str, new: &str) -> Self {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();

        let prefix = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(new[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        Self::new(
            prefix,
            old.len() - prefix - suffix,
            new.len() - prefix - suffix,
        )
    }

    /// End of the replaced text, in pre-edit offsets
    pub fn old_end(&self) -> usize {
        self.start + self.old_len
    }

    /// End of the inserted text, in post-edit offsets
    pub fn new_end(&self) -> usize {
        self.start + self.new_len
    }

    pub fn is_noop(&self) -> bool {
        self.old_len == 0 && self.new_len == 0
    }
}

/// Result of mapping tracked mentions across an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustment {
    /// Surviving mentions, ascending by start
    pub kept: Vec<MentionRange>,
    /// Mentions whose text the edit touched, with their pre-edit ranges
    pub invalidated: Vec<MentionRange>,
}

/// Map `mentions` across `edit`.
pub fn adjust(mentions: Vec<MentionRange>, edit: &Edit) -> Adjustment {
    let mut adjustment = Adjustment::default();

    for mut mention in mentions {
        let range = mention.range;
        if edit.start >= range.end() {
            adjustment.kept.push(mention);
        } else if edit.old_end() <= range.start {
            mention.range.start = range.start + edit.new_len - edit.old_len;
            trace!(
                name = %mention.display_name,
                from = range.start,
                to = mention.range.start,
                "shifted mention"
            );
            adjustment.kept.push(mention);
        } else {
            trace!(name = %mention.display_name, ?range, ?edit, "edit invalidated mention");
            adjustment.invalidated.push(mention);
        }
    }

    adjustment.kept.sort_by_key(|m| m.range.start);
    debug_assert!(
        is_disjoint(&adjustment.kept),
        "tracked mentions overlap after {:?}",
        edit
    );
    adjustment
}

/// Span of post-edit text that held a broken mention plus the edit's new text
pub fn damaged_span(mention: &TextRange, edit: &Edit) -> TextRange {
    let start = mention.start.min(edit.start);
    let end = if mention.end() > edit.old_end() {
        mention.end() + edit.new_len - edit.old_len
    } else {
        edit.new_end()
    };
    TextRange::from_bounds(start, end)
}

/// True when no two of the ranges (sorted by start) overlap
pub fn is_disjoint(sorted: &[MentionRange]) -> bool {
    sorted
        .windows(2)
        .all(|pair| pair[0].range.end() <= pair[1].range.start)
}
