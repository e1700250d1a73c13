use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use tracing::info;

use mentions_core::{MentionEngine, MentionListener, MentionRange, NewMention, TextBuffer};

use crate::io::Settings;

/// Picker state driven by engine events
#[derive(Default)]
pub struct Picker {
    pub visible: Cell<bool>,
    pub trigger: Cell<char>,
    pub query: RefCell<String>,
    pub selected: Cell<usize>,
    /// Set when the return key confirmed the search
    pub confirmed: Cell<bool>,
    pub last_event: RefCell<Option<String>>,
}

impl Picker {
    fn note(&self, message: String) {
        *self.last_event.borrow_mut() = Some(message);
    }
}

impl MentionListener for Picker {
    fn on_mention_added(&self, mention: &MentionRange) {
        info!(name = %mention.display_name, start = mention.start(), "mention added");
        self.note(format!("Added {}", mention.display_name));
    }

    fn on_mention_removed(&self, mention: &MentionRange) {
        info!(name = %mention.display_name, start = mention.start(), "mention removed");
        self.note(format!("Removed {}", mention.display_name));
    }

    fn on_search_show(&self, trigger: char, query: &str) {
        self.visible.set(true);
        self.trigger.set(trigger);
        self.selected.set(0);
        *self.query.borrow_mut() = query.to_string();
    }

    fn on_search_update(&self, query: &str) {
        self.selected.set(0);
        *self.query.borrow_mut() = query.to_string();
    }

    // The query stays around so a confirmed search can still pick from it
    fn on_search_hide(&self) {
        self.visible.set(false);
    }

    fn should_add_mention_on_return_key(&self) -> bool {
        self.confirmed.set(self.visible.get());
        self.visible.get()
    }
}

/// Terminal application state
pub struct App {
    pub engine: MentionEngine<TextBuffer>,
    pub picker: Rc<Picker>,
    pub candidates: Vec<String>,
    pub running: bool,
    pub show_help: bool,
    pub filename: Option<String>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new(settings: Settings, text: &str) -> Result<Self> {
        let mut engine = MentionEngine::new(TextBuffer::from_text(text), settings.engine)?;
        let picker = Rc::new(Picker::default());
        engine.set_listener(picker.clone());

        Ok(Self {
            engine,
            picker,
            candidates: settings.candidates,
            running: true,
            show_help: false,
            filename: None,
            status_message: None,
        })
    }

    /// Candidates whose name starts with, or contains a word starting
    /// with, the current query
    pub fn matches(&self) -> Vec<&str> {
        let query = self.picker.query.borrow().to_lowercase();
        self.candidates
            .iter()
            .map(String::as_str)
            .filter(|name| {
                name.to_lowercase()
                    .split_whitespace()
                    .any(|word| word.starts_with(&query))
            })
            .collect()
    }

    pub fn picker_visible(&self) -> bool {
        self.picker.visible.get()
    }

    pub fn type_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.engine.insert_text(c.encode_utf8(&mut buf));
        self.take_event();
    }

    pub fn backspace(&mut self) {
        self.engine.delete_backward();
        self.take_event();
    }

    /// Return key: newline, or confirm the picker selection
    pub fn enter(&mut self) {
        self.picker.confirmed.set(false);
        if !self.engine.insert_text("\n") && self.picker.confirmed.get() {
            self.select_candidate();
        }
        self.take_event();
    }

    /// Finalize the search with the highlighted candidate
    pub fn select_candidate(&mut self) {
        let name = self
            .matches()
            .get(self.picker.selected.get())
            .map(|s| s.to_string());
        match name {
            Some(name) => {
                self.engine.add_mention(NewMention::new(name));
            }
            None => self.set_status("No matching name"),
        }
        self.take_event();
    }

    pub fn picker_next(&mut self) {
        let count = self.matches().len();
        if count > 0 {
            self.picker.selected.set((self.picker.selected.get() + 1) % count);
        }
    }

    pub fn picker_prev(&mut self) {
        let count = self.matches().len();
        if count > 0 {
            let selected = self.picker.selected.get();
            self.picker
                .selected
                .set(if selected == 0 { count - 1 } else { selected - 1 });
        }
    }

    /// Move the caret with `f`, then let the engine re-check the search
    pub fn move_caret(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        f(self.engine.host_mut());
        self.engine.selection_did_change();
    }

    pub fn clear_mentions(&mut self) {
        self.engine.clear_mentions();
        self.set_status("Cleared mentions");
    }

    fn take_event(&mut self) {
        if let Some(message) = self.picker.last_event.borrow_mut().take() {
            self.status_message = Some(message);
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Get title for display
    pub fn title(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| "Untitled".to_string())
    }
}
