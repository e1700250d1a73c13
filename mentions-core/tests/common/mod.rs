//! Shared test utilities

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mentions_core::{
    AttributeSet, AttributeValue, HostDelegate, MentionConfig, MentionEngine, MentionEvent,
    MentionListener, MentionRange, TextBuffer, TextRange,
};

pub const FOREGROUND: &str = "foreground";

pub fn red() -> AttributeSet {
    AttributeSet::new().with(FOREGROUND, "red")
}

pub fn black() -> AttributeSet {
    AttributeSet::new().with(FOREGROUND, "black")
}

pub fn config() -> MentionConfig {
    MentionConfig::new(red(), black())
}

/// Records every event it receives, in order
#[derive(Default)]
pub struct RecordingListener {
    pub events: RefCell<Vec<MentionEvent>>,
    pub add_on_return: Cell<bool>,
    pub return_key_asked: Cell<bool>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<MentionEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn hidden(&self) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|e| matches!(e, MentionEvent::SearchHide))
    }

    pub fn removed(&self) -> Vec<MentionRange> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                MentionEvent::Removed(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }
}

impl MentionListener for RecordingListener {
    fn on_mention_added(&self, mention: &MentionRange) {
        self.events
            .borrow_mut()
            .push(MentionEvent::Added(mention.clone()));
    }

    fn on_mention_removed(&self, mention: &MentionRange) {
        self.events
            .borrow_mut()
            .push(MentionEvent::Removed(mention.clone()));
    }

    fn on_search_show(&self, trigger: char, query: &str) {
        self.events.borrow_mut().push(MentionEvent::SearchShow {
            trigger,
            query: query.to_string(),
        });
    }

    fn on_search_update(&self, query: &str) {
        self.events
            .borrow_mut()
            .push(MentionEvent::SearchUpdate(query.to_string()));
    }

    fn on_search_hide(&self) {
        self.events.borrow_mut().push(MentionEvent::SearchHide);
    }

    fn should_add_mention_on_return_key(&self) -> bool {
        self.return_key_asked.set(true);
        self.add_on_return.get()
    }
}

/// Host delegate with fixed answers, recording notifications
#[derive(Default)]
pub struct ScriptedDelegate {
    pub answer: Option<bool>,
    pub notified: Cell<bool>,
}

impl ScriptedDelegate {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Some(answer),
            notified: Cell::new(false),
        }
    }
}

impl HostDelegate for ScriptedDelegate {
    fn should_begin_editing(&self) -> Option<bool> {
        self.answer
    }

    fn should_end_editing(&self) -> Option<bool> {
        self.answer
    }

    fn should_interact_with_url(&self, _url: &str, _range: TextRange) -> Option<bool> {
        self.answer
    }

    fn should_interact_with_attachment(&self, _range: TextRange) -> Option<bool> {
        self.answer
    }

    fn did_begin_editing(&self) {
        self.notified.set(true);
    }

    fn did_end_editing(&self) {
        self.notified.set(true);
    }
}

/// Engine over `text` with the red/black config and a recording listener
pub fn engine_with(
    text: &str,
    config: MentionConfig,
) -> (MentionEngine<TextBuffer>, Rc<RecordingListener>) {
    let mut engine = MentionEngine::new(TextBuffer::from_text(text), config).unwrap();
    let listener = Rc::new(RecordingListener::default());
    engine.set_listener(listener.clone());
    (engine, listener)
}

/// Foreground color of the character at `offset`
pub fn color_at(engine: &MentionEngine<TextBuffer>, offset: usize) -> Option<AttributeValue> {
    engine.host().attribute_at(offset, FOREGROUND).cloned()
}

/// Type `text` one character at a time, like a keyboard would
pub fn type_chars(engine: &mut MentionEngine<TextBuffer>, text: &str) {
    for c in text.chars() {
        let mut buf = [0u8; 4];
        engine.insert_text(c.encode_utf8(&mut buf));
    }
}
