use std::rc::Rc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::adjust::{adjust, damaged_span, is_disjoint, Adjustment, Edit};
use crate::config::MentionConfig;
use crate::error::{MentionResult, PreconditionViolation};
use crate::host::TextHost;
use crate::listener::{HostDelegate, HostQuery, MentionEvent, MentionListener};
use crate::model::{MentionRange, NewMention, TextRange};
use crate::text::char_len;
use crate::trigger::{CandidateSearch, TriggerDetector};

/// Search state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Searching(CandidateSearch),
}

/// Tracks mentions inside a [`TextHost`] and reconciles them with edits
pub struct MentionEngine<H: TextHost> {
    host: H,
    config: MentionConfig,
    detector: TriggerDetector,

    /// Ascending by start, never overlapping
    mentions: Vec<MentionRange>,
    search: SearchState,
    /// Search confirmed with the return key; finalizable until the next edit
    confirmed: Option<CandidateSearch>,

    listener: Option<Rc<dyn MentionListener>>,
    delegate: Option<Rc<dyn HostDelegate>>,

    // Events wait here until the operation has committed its state
    outbox: Vec<MentionEvent>,
    /// Leave events in the outbox for [`MentionEngine::take_events`]
    deferred: bool,
}

impl<H: TextHost> MentionEngine<H> {
    pub fn new(mut host: H, config: MentionConfig) -> MentionResult<Self> {
        config.validate()?;
        host.set_typing_attributes(&config.default_attributes);
        Ok(Self {
            host,
            detector: TriggerDetector::from_config(&config),
            config,
            mentions: Vec::new(),
            search: SearchState::Idle,
            confirmed: None,
            listener: None,
            delegate: None,
            outbox: Vec::new(),
            deferred: false,
        })
    }

    pub fn set_listener(&mut self, listener: Rc<dyn MentionListener>) {
        self.listener = Some(listener);
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn listener(&self) -> Option<Rc<dyn MentionListener>> {
        self.listener.clone()
    }

    /// Queue events instead of dispatching them when an operation ends.
    ///
    /// The caller drains them with [`MentionEngine::take_events`] once it no
    /// longer holds the engine, see [`crate::SharedEngine`].
    pub fn defer_events(&mut self, deferred: bool) {
        self.deferred = deferred;
    }

    /// Drain queued events, oldest first
    pub fn take_events(&mut self) -> Vec<MentionEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn set_delegate(&mut self, delegate: Rc<dyn HostDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct access to the host. Text changed through here must be
    /// reported with [`MentionEngine::text_did_change`].
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &MentionConfig {
        &self.config
    }

    /// Tracked mentions, ascending by start
    pub fn mentions(&self) -> &[MentionRange] {
        &self.mentions
    }

    /// The mention covering the character at `offset`
    pub fn mention_at(&self, offset: usize) -> Option<&MentionRange> {
        self.mentions.iter().find(|m| m.range.contains(offset))
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.search, SearchState::Searching(_))
    }

    // Editing

    /// Gate an edit before the host applies it.
    ///
    /// Returns `false` when the edit must not be applied: a return key that
    /// the listener turned into a mention confirmation.
    pub fn should_change_text(&mut self, _range: TextRange, replacement: &str) -> bool {
        self.host
            .set_typing_attributes(&self.config.default_attributes);

        if replacement != "\n" || !self.config.add_mention_after_return_key {
            return true;
        }
        let SearchState::Searching(candidate) = &self.search else {
            return true;
        };
        let confirm = self
            .listener
            .as_ref()
            .is_some_and(|l| l.should_add_mention_on_return_key());
        if !confirm {
            return true;
        }

        debug!(query = %candidate.query, "return key confirmed search");
        self.confirmed = Some(candidate.clone());
        self.search = SearchState::Idle;
        self.emit(MentionEvent::SearchHide);
        self.flush();
        false
    }

    /// Reconcile after the host applied `edit`.
    pub fn text_did_change(&mut self, edit: Edit) {
        self.confirmed = None;
        if !edit.is_noop() {
            self.reconcile(&edit);
        }
        if self.host.is_empty() {
            self.host
                .set_typing_attributes(&self.config.default_attributes);
        }
        self.update_search();
        self.flush();
    }

    /// Gate, apply and reconcile a replacement. Returns whether it was applied.
    pub fn replace_text(&mut self, range: TextRange, replacement: &str) -> bool {
        if !self.should_change_text(range, replacement) {
            return false;
        }
        let len = self.host.len();
        let end = range.start.saturating_add(range.length).min(len);
        let range = TextRange::from_bounds(range.start.min(len), end);
        self.host.replace_range(range, replacement);
        self.text_did_change(Edit::replace(range, replacement));
        true
    }

    /// Type `text` over the current selection
    pub fn insert_text(&mut self, text: &str) -> bool {
        let selection = self.host.selection();
        self.replace_text(selection, text)
    }

    /// Backspace: delete the selection, or the character before the caret
    pub fn delete_backward(&mut self) -> bool {
        let selection = self.host.selection();
        let range = if selection.is_empty() {
            if selection.start == 0 {
                return false;
            }
            TextRange::new(selection.start - 1, 1)
        } else {
            selection
        };
        self.replace_text(range, "")
    }

    /// The caret moved without an edit. Can end a search, never starts one.
    pub fn selection_did_change(&mut self) {
        let (trigger_offset, query) = match &self.search {
            SearchState::Searching(candidate) => {
                (candidate.trigger_offset, candidate.query.clone())
            }
            SearchState::Idle => return,
        };
        let selection = self.host.selection();
        let found = selection
            .is_empty()
            .then(|| self.detector.detect(self.host.text(), selection.start))
            .flatten()
            .filter(|c| c.trigger_offset == trigger_offset);

        match found {
            Some(current) if current.query == query => {}
            Some(current) => {
                self.emit(MentionEvent::SearchUpdate(current.query.clone()));
                self.search = SearchState::Searching(current);
            }
            None => {
                debug!("caret left search span");
                self.search = SearchState::Idle;
                self.emit(MentionEvent::SearchHide);
            }
        }
        self.flush();
    }

    // Mentions

    /// Finalize the active (or return-key confirmed) search into a mention.
    ///
    /// Replaces the trigger and query with the display name, tracks the new
    /// range and styles it. Returns `None` when there is nothing to finalize.
    pub fn add_mention(&mut self, mention: NewMention) -> Option<MentionRange> {
        let candidate = match std::mem::take(&mut self.search) {
            SearchState::Searching(candidate) => {
                self.emit(MentionEvent::SearchHide);
                Some(candidate)
            }
            SearchState::Idle => self.confirmed.take(),
        };
        self.confirmed = None;

        let tracked = candidate.and_then(|candidate| self.finalize(candidate, mention));
        self.flush();
        tracked
    }

    fn finalize(&mut self, candidate: CandidateSearch, mention: NewMention) -> Option<MentionRange> {
        let span = TextRange::new(candidate.trigger_offset, candidate.span_len());
        if mention.display_name.is_empty() || span.end() > self.host.len() {
            warn!(name = %mention.display_name, ?span, "cannot finalize search");
            return None;
        }

        let default = self.config.default_attributes.clone();
        let mut replacement = mention.display_name.clone();
        if self.config.space_after_mention {
            replacement.push(' ');
        }

        self.host.set_typing_attributes(&default);
        self.host.replace_range(span, &replacement);
        self.reconcile(&Edit::replace(span, &replacement));

        let range = TextRange::new(span.start, char_len(&mention.display_name));
        self.host
            .apply_attributes(range, &self.config.mention_attributes);
        if self.config.space_after_mention {
            self.host.apply_attributes(TextRange::new(range.end(), 1), &default);
        }
        self.host
            .set_selection(TextRange::caret(span.start + char_len(&replacement)));

        let tracked = MentionRange::with_id(mention.id, mention.display_name, range);
        let index = self.mentions.partition_point(|m| m.range.start < range.start);
        self.mentions.insert(index, tracked.clone());
        debug_assert!(is_disjoint(&self.mentions), "finalized mention overlaps");

        debug!(name = %tracked.display_name, ?range, "mention added");
        self.emit(MentionEvent::Added(tracked.clone()));
        Some(tracked)
    }

    /// Seed mentions whose names are already in the text.
    ///
    /// Replaces every tracked mention. Ranges outside the text or
    /// overlapping each other are a caller bug and leave the engine untouched.
    /// Emits nothing, except `SearchHide` when a seeded mention covers the
    /// trigger of the active search.
    pub fn insert_mentions(&mut self, mentions: Vec<MentionRange>) -> MentionResult<()> {
        let text_len = self.host.len();
        let out_of_bounds = mentions
            .iter()
            .find(|m| m.range.checked_end().map_or(true, |end| end > text_len));
        if let Some(m) = out_of_bounds {
            let violation = PreconditionViolation::OutOfBounds {
                name: m.display_name.clone(),
                start: m.start(),
                end: m.start().saturating_add(m.range.length),
                text_len,
            };
            error!(%violation, "rejected seeded mentions");
            return Err(violation.into());
        }

        let mut sorted = mentions;
        sorted.sort_by_key(|m| m.range.start);
        if let Some(pair) = sorted.windows(2).find(|p| p[0].end() > p[1].start()) {
            let violation = PreconditionViolation::Overlap {
                name: pair[1].display_name.clone(),
                start: pair[1].start(),
                end: pair[1].end(),
                other: pair[0].display_name.clone(),
            };
            error!(%violation, "rejected seeded mentions");
            return Err(violation.into());
        }

        self.host
            .apply_attributes(TextRange::new(0, text_len), &self.config.default_attributes);
        for mention in &sorted {
            self.host
                .apply_attributes(mention.range, &self.config.mention_attributes);
        }
        self.host
            .set_typing_attributes(&self.config.default_attributes);

        debug!(count = sorted.len(), "seeded mentions");
        self.mentions = sorted;

        if self
            .confirmed
            .as_ref()
            .is_some_and(|c| self.mention_at(c.trigger_offset).is_some())
        {
            self.confirmed = None;
        }
        let covered = match &self.search {
            SearchState::Searching(candidate) => {
                self.mention_at(candidate.trigger_offset).is_some()
            }
            SearchState::Idle => false,
        };
        if covered {
            debug!("seeded mention covers the search trigger");
            self.search = SearchState::Idle;
            self.emit(MentionEvent::SearchHide);
            self.flush();
        }
        Ok(())
    }

    /// Stop tracking a mention and restore default styling over it
    pub fn remove_mention(&mut self, id: Uuid) -> Option<MentionRange> {
        let index = self.mentions.iter().position(|m| m.id == id)?;
        let removed = self.mentions.remove(index);
        self.host
            .apply_attributes(removed.range, &self.config.default_attributes);
        self.emit(MentionEvent::Removed(removed.clone()));
        self.flush();
        Some(removed)
    }

    /// Drop every mention and restore default styling on the whole text
    pub fn clear_mentions(&mut self) {
        let removed = std::mem::take(&mut self.mentions);
        let len = self.host.len();
        self.host
            .apply_attributes(TextRange::new(0, len), &self.config.default_attributes);
        for mention in removed {
            self.emit(MentionEvent::Removed(mention));
        }
        self.flush();
    }

    // Forwarded host callbacks

    /// Answer a host query from the delegate, or the default policy
    pub fn ask(&self, query: HostQuery<'_>) -> bool {
        query.resolve(self.delegate.as_deref())
    }

    pub fn should_begin_editing(&self) -> bool {
        self.ask(HostQuery::BeginEditing)
    }

    pub fn should_end_editing(&self) -> bool {
        self.ask(HostQuery::EndEditing)
    }

    pub fn should_interact_with_url(&self, url: &str, range: TextRange) -> bool {
        self.ask(HostQuery::InteractWithUrl { url, range })
    }

    pub fn should_interact_with_attachment(&self, range: TextRange) -> bool {
        self.ask(HostQuery::InteractWithAttachment { range })
    }

    pub fn did_begin_editing(&self) {
        if let Some(delegate) = &self.delegate {
            delegate.did_begin_editing();
        }
    }

    pub fn did_end_editing(&self) {
        if let Some(delegate) = &self.delegate {
            delegate.did_end_editing();
        }
    }

    // Internals

    fn reconcile(&mut self, edit: &Edit) {
        let Adjustment { kept, invalidated } = adjust(std::mem::take(&mut self.mentions), edit);
        self.mentions = kept;

        for mention in invalidated {
            let span = damaged_span(&mention.range, edit);
            self.host
                .apply_attributes(span, &self.config.default_attributes);
            debug!(name = %mention.display_name, range = ?mention.range, "mention removed");
            self.emit(MentionEvent::Removed(mention));
        }
    }

    fn update_search(&mut self) {
        let selection = self.host.selection();
        let found = selection
            .is_empty()
            .then(|| self.detector.detect(self.host.text(), selection.start))
            .flatten()
            .filter(|c| self.mention_at(c.trigger_offset).is_none());

        let previous = std::mem::take(&mut self.search);
        let Some(candidate) = found else {
            if let SearchState::Searching(old) = previous {
                debug!(query = %old.query, "search ended");
                self.emit(MentionEvent::SearchHide);
            }
            return;
        };

        let restarted = match &previous {
            SearchState::Searching(old) => {
                old.trigger_offset != candidate.trigger_offset || old.trigger != candidate.trigger
            }
            SearchState::Idle => true,
        };
        if restarted {
            if matches!(previous, SearchState::Searching(_)) {
                self.emit(MentionEvent::SearchHide);
            }
            debug!(trigger = %candidate.trigger, offset = candidate.trigger_offset, "search started");
            self.emit(MentionEvent::SearchShow {
                trigger: candidate.trigger,
                query: candidate.query.clone(),
            });
        }
        self.emit(MentionEvent::SearchUpdate(candidate.query.clone()));
        self.search = SearchState::Searching(candidate);
    }

    fn emit(&mut self, event: MentionEvent) {
        self.outbox.push(event);
    }

    fn flush(&mut self) {
        if self.deferred {
            return;
        }
        let events = std::mem::take(&mut self.outbox);
        let Some(listener) = self.listener.clone() else {
            return;
        };
        for event in &events {
            event.dispatch(&*listener);
        }
    }
}
