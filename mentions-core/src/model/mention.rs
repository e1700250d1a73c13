use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TextRange;

/// A tracked mention inside the buffer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MentionRange {
    pub id: Uuid,
    pub display_name: String,
    #[serde(flatten)]
    pub range: TextRange,
}

impl MentionRange {
    pub fn new(display_name: impl Into<String>, range: TextRange) -> Self {
        Self::with_id(Uuid::new_v4(), display_name, range)
    }

    pub fn with_id(id: Uuid, display_name: impl Into<String>, range: TextRange) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            range,
        }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end()
    }
}

/// The picker selection handed to the engine to finalize a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMention {
    pub id: Uuid,
    pub display_name: String,
}

impl NewMention {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}
