use serde::{Deserialize, Serialize};

use crate::error::{MentionError, MentionResult};
use crate::model::AttributeSet;

/// Engine configuration, fixed at construction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MentionConfig {
    /// Applied to finalized mentions
    pub mention_attributes: AttributeSet,
    /// Applied to everything else
    pub default_attributes: AttributeSet,
    /// Characters that start a search
    pub triggers: Vec<char>,
    /// Return key confirms the active search instead of inserting a newline
    pub add_mention_after_return_key: bool,
    /// Whitespace inside a pending query keeps the search alive
    pub search_spaces_in_query: bool,
    /// Finalizing a mention appends a plain space after it
    pub space_after_mention: bool,
}

impl Default for MentionConfig {
    fn default() -> Self {
        Self {
            mention_attributes: AttributeSet::new(),
            default_attributes: AttributeSet::new(),
            triggers: vec!['@'],
            add_mention_after_return_key: false,
            search_spaces_in_query: false,
            space_after_mention: false,
        }
    }
}

impl MentionConfig {
    pub fn new(mention_attributes: AttributeSet, default_attributes: AttributeSet) -> Self {
        Self {
            mention_attributes,
            default_attributes,
            ..Self::default()
        }
    }

    pub fn with_triggers(mut self, triggers: impl IntoIterator<Item = char>) -> Self {
        self.triggers = triggers.into_iter().collect();
        self
    }

    pub fn with_add_mention_after_return_key(mut self, enabled: bool) -> Self {
        self.add_mention_after_return_key = enabled;
        self
    }

    pub fn with_search_spaces_in_query(mut self, enabled: bool) -> Self {
        self.search_spaces_in_query = enabled;
        self
    }

    pub fn with_space_after_mention(mut self, enabled: bool) -> Self {
        self.space_after_mention = enabled;
        self
    }

    pub fn validate(&self) -> MentionResult<()> {
        if self.triggers.is_empty() {
            return Err(MentionError::InvalidConfig(
                "at least one trigger character is required".to_string(),
            ));
        }
        if let Some(c) = self.triggers.iter().find(|c| c.is_whitespace()) {
            return Err(MentionError::InvalidConfig(format!(
                "trigger {:?} must not be whitespace",
                c
            )));
        }
        Ok(())
    }
}
