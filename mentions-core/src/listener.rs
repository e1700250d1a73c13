//! Callback surfaces: the mention listener and the forwarded host delegate.

use crate::model::{MentionRange, TextRange};

/// Receives mention lifecycle and search events.
///
/// Every method has a no-op default so a listener only implements what it
/// cares about. Callbacks run after the engine has committed its state.
pub trait MentionListener {
    fn on_mention_added(&self, _mention: &MentionRange) {}

    fn on_mention_removed(&self, _mention: &MentionRange) {}

    fn on_search_show(&self, _trigger: char, _query: &str) {}

    fn on_search_update(&self, _query: &str) {}

    fn on_search_hide(&self) {}

    /// Asked when return is pressed during a search with
    /// `add_mention_after_return_key` enabled
    fn should_add_mention_on_return_key(&self) -> bool {
        false
    }
}

/// Event emitted by the engine, in dispatch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionEvent {
    Added(MentionRange),
    Removed(MentionRange),
    SearchShow { trigger: char, query: String },
    SearchUpdate(String),
    SearchHide,
}

impl MentionEvent {
    pub fn dispatch(&self, listener: &dyn MentionListener) {
        match self {
            MentionEvent::Added(mention) => listener.on_mention_added(mention),
            MentionEvent::Removed(mention) => listener.on_mention_removed(mention),
            MentionEvent::SearchShow { trigger, query } => listener.on_search_show(*trigger, query),
            MentionEvent::SearchUpdate(query) => listener.on_search_update(query),
            MentionEvent::SearchHide => listener.on_search_hide(),
        }
    }
}

/// Generic editing callbacks the host surface defines.
///
/// Queries return `None` to decline, which resolves to the default policy
/// of [`HostQuery::default_answer`].
pub trait HostDelegate {
    fn should_begin_editing(&self) -> Option<bool> {
        None
    }

    fn should_end_editing(&self) -> Option<bool> {
        None
    }

    fn should_interact_with_url(&self, _url: &str, _range: TextRange) -> Option<bool> {
        None
    }

    fn should_interact_with_attachment(&self, _range: TextRange) -> Option<bool> {
        None
    }

    fn did_begin_editing(&self) {}

    fn did_end_editing(&self) {}
}

/// A boolean question the host surface asks before acting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostQuery<'a> {
    BeginEditing,
    EndEditing,
    InteractWithUrl { url: &'a str, range: TextRange },
    InteractWithAttachment { range: TextRange },
}

impl HostQuery<'_> {
    /// Answer used when no delegate is set or the delegate declines
    pub fn default_answer(&self) -> bool {
        match self {
            HostQuery::BeginEditing
            | HostQuery::EndEditing
            | HostQuery::InteractWithUrl { .. }
            | HostQuery::InteractWithAttachment { .. } => true,
        }
    }

    /// Ask `delegate`, falling back to the default answer
    pub fn resolve(&self, delegate: Option<&dyn HostDelegate>) -> bool {
        let answer = delegate.and_then(|d| match self {
            HostQuery::BeginEditing => d.should_begin_editing(),
            HostQuery::EndEditing => d.should_end_editing(),
            HostQuery::InteractWithUrl { url, range } => d.should_interact_with_url(url, *range),
            HostQuery::InteractWithAttachment { range } => {
                d.should_interact_with_attachment(*range)
            }
        });
        answer.unwrap_or_else(|| self.default_answer())
    }
}
