//! Trigger detection around the caret.

use serde::{Deserialize, Serialize};

use crate::config::MentionConfig;

/// A pending search started by a trigger character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearch {
    pub trigger: char,
    /// Character offset of the trigger
    pub trigger_offset: usize,
    /// Text typed after the trigger, up to the caret
    pub query: String,
}

impl CandidateSearch {
    /// Characters covered by the trigger and the query
    pub fn span_len(&self) -> usize {
        1 + self.query.chars().count()
    }

    /// Exclusive end of the trigger and query
    pub fn end(&self) -> usize {
        self.trigger_offset + self.span_len()
    }
}

/// Finds the candidate search the caret is currently in, if any
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    triggers: Vec<char>,
    search_spaces: bool,
}

impl TriggerDetector {
    pub fn new(triggers: Vec<char>, search_spaces: bool) -> Self {
        Self {
            triggers,
            search_spaces,
        }
    }

    pub fn from_config(config: &MentionConfig) -> Self {
        Self::new(config.triggers.clone(), config.search_spaces_in_query)
    }

    pub fn is_trigger(&self, c: char) -> bool {
        self.triggers.contains(&c)
    }

    /// Scan backwards from `caret` (a character offset) for a trigger.
    ///
    /// A trigger only counts at the start of the text or after whitespace,
    /// so `mail@example` never starts a search. Newlines always end the
    /// scan; other whitespace ends it unless spaces are searchable.
    pub fn detect(&self, text: &str, caret: usize) -> Option<CandidateSearch> {
        let before: Vec<char> = text.chars().take(caret).collect();
        if before.len() < caret {
            return None;
        }

        for i in (0..before.len()).rev() {
            let c = before[i];
            if self.is_trigger(c) && (i == 0 || before[i - 1].is_whitespace()) {
                return Some(CandidateSearch {
                    trigger: c,
                    trigger_offset: i,
                    query: before[i + 1..].iter().collect(),
                });
            }
            if c == '\n' || c == '\r' || (c.is_whitespace() && !self.search_spaces) {
                return None;
            }
        }
        None
    }
}
