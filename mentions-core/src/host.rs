use crate::model::{AttributeSet, AttributeValue, TextRange};
use crate::text::{byte_index, char_len};

/// The editable text surface the engine drives.
///
/// All offsets are character offsets.
pub trait TextHost {
    fn text(&self) -> &str;

    fn len(&self) -> usize {
        char_len(self.text())
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Current selection; a caret when empty
    fn selection(&self) -> TextRange;

    fn set_selection(&mut self, selection: TextRange);

    fn caret(&self) -> usize {
        self.selection().end()
    }

    /// Replace `range` with `replacement` and put the caret after it
    fn replace_range(&mut self, range: TextRange, replacement: &str);

    fn apply_attributes(&mut self, range: TextRange, attributes: &AttributeSet);

    /// Attributes given to text typed from now on
    fn set_typing_attributes(&mut self, attributes: &AttributeSet);
}

/// In-memory text surface with per-character attributes and a caret
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    /// One entry per character of `text`
    attributes: Vec<AttributeSet>,
    selection: TextRange,
    typing_attributes: AttributeSet,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load content with the caret at the end
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content without styling it, caret at the end
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.attributes = vec![AttributeSet::new(); char_len(text)];
        self.selection = TextRange::caret(self.attributes.len());
    }

    pub fn attributes_at(&self, offset: usize) -> Option<&AttributeSet> {
        self.attributes.get(offset)
    }

    /// Value of attribute `name` on the character at `offset`
    pub fn attribute_at(&self, offset: usize, name: &str) -> Option<&AttributeValue> {
        self.attributes_at(offset)?.get(name)
    }

    pub fn typing_attributes(&self) -> &AttributeSet {
        &self.typing_attributes
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.selection = TextRange::caret(offset.min(self.attributes.len()));
    }

    /// Character offsets at which each line starts
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in self.text.chars().enumerate() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    fn line_len(&self, row: usize) -> usize {
        self.text
            .split('\n')
            .nth(row)
            .map(char_len)
            .unwrap_or(0)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    /// Convert (row, col) to character offset
    pub fn cursor_to_offset(&self, row: usize, col: usize) -> usize {
        let starts = self.line_starts();
        match starts.get(row) {
            Some(&start) => start + col.min(self.line_len(row)),
            None => self.attributes.len(),
        }
    }

    /// Convert character offset to (row, col)
    pub fn offset_to_cursor(&self, offset: usize) -> (usize, usize) {
        for (i, &start) in self.line_starts().iter().enumerate().rev() {
            if offset >= start {
                return (i, offset - start);
            }
        }
        (0, 0)
    }

    /// Caret position as (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        self.offset_to_cursor(self.caret())
    }

    // Caret movement methods

    pub fn move_left(&mut self) {
        let caret = self.caret();
        self.set_caret(caret.saturating_sub(1));
    }

    pub fn move_right(&mut self) {
        let caret = self.caret();
        self.set_caret(caret + 1);
    }

    pub fn move_up(&mut self) {
        let (row, col) = self.cursor();
        if row > 0 {
            self.set_caret(self.cursor_to_offset(row - 1, col));
        }
    }

    pub fn move_down(&mut self) {
        let (row, col) = self.cursor();
        if row + 1 < self.line_count() {
            self.set_caret(self.cursor_to_offset(row + 1, col));
        }
    }

    pub fn move_to_line_start(&mut self) {
        let (row, _) = self.cursor();
        self.set_caret(self.cursor_to_offset(row, 0));
    }

    pub fn move_to_line_end(&mut self) {
        let (row, _) = self.cursor();
        self.set_caret(self.cursor_to_offset(row, usize::MAX));
    }

    fn clamp(&self, range: TextRange) -> TextRange {
        let len = self.attributes.len();
        let start = range.start.min(len);
        TextRange::from_bounds(start, range.end().min(len))
    }
}

impl TextHost for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn selection(&self) -> TextRange {
        self.selection
    }

    fn set_selection(&mut self, selection: TextRange) {
        self.selection = self.clamp(selection);
    }

    fn replace_range(&mut self, range: TextRange, replacement: &str) {
        let range = self.clamp(range);
        let start = byte_index(&self.text, range.start);
        let end = byte_index(&self.text, range.end());
        self.text.replace_range(start..end, replacement);

        let inserted = char_len(replacement);
        self.attributes.splice(
            range.start..range.end(),
            std::iter::repeat(self.typing_attributes.clone()).take(inserted),
        );
        self.selection = TextRange::caret(range.start + inserted);
    }

    fn apply_attributes(&mut self, range: TextRange, attributes: &AttributeSet) {
        let range = self.clamp(range);
        for slot in &mut self.attributes[range.start..range.end()] {
            *slot = attributes.clone();
        }
    }

    fn set_typing_attributes(&mut self, attributes: &AttributeSet) {
        self.typing_attributes = attributes.clone();
    }
}
