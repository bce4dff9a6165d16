//! Edit buffer with selection tracking.
//!
//! The buffer holds the live text of the editor and a selection range. Offsets
//! are character (Unicode scalar) indices, not bytes and not grapheme
//! clusters: the lam-alif variant "لا" occupies two positions.

/// Live editor text plus a selection. `start == end` is a plain caret.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBuffer {
    text: String,
    start: usize,
    end: usize,
}

impl EditBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the caret at the end.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut buf = Self::new();
        buf.replace_all(text);
        buf
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selection as `(start, end)` character offsets, `start <= end`.
    pub fn selection(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Caret position (the selection end).
    pub fn cursor(&self) -> usize {
        self.end
    }

    pub fn has_selection(&self) -> bool {
        self.start != self.end
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of the character at `pos` (or the end of the text).
    fn byte_offset(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Select a range, as a host text field would. Out-of-range offsets are
    /// clamped and reversed ranges normalized.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.char_count();
        let (a, b) = (start.min(len), end.min(len));
        self.start = a.min(b);
        self.end = a.max(b);
    }

    /// Place the caret at `pos` (clamped).
    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    pub fn select_all(&mut self) {
        self.set_selection(0, self.char_count());
    }

    /// Splice `new_text` over the selection; caret ends after the insertion.
    pub fn insert(&mut self, new_text: &str) {
        let from = self.byte_offset(self.start);
        let to = self.byte_offset(self.end);
        self.text.replace_range(from..to, new_text);
        let caret = self.start + new_text.chars().count();
        self.start = caret;
        self.end = caret;
    }

    /// Delete the selection, or the character before the caret.
    /// Returns true if anything was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.has_selection() {
            let from = self.byte_offset(self.start);
            let to = self.byte_offset(self.end);
            self.text.replace_range(from..to, "");
            self.end = self.start;
            return true;
        }

        if self.start == 0 {
            return false;
        }

        let from = self.byte_offset(self.start - 1);
        let to = self.byte_offset(self.start);
        self.text.replace_range(from..to, "");
        self.start -= 1;
        self.end = self.start;
        true
    }

    /// Replace the whole text (bulk edit); caret moves to the end.
    pub fn replace_all(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let len = self.char_count();
        self.start = len;
        self.end = len;
    }

    /// Host-side edit: the text field changed underneath us and reports its
    /// own caret.
    pub fn set_text(&mut self, text: impl Into<String>, cursor: usize) {
        self.text = text.into();
        self.set_cursor(cursor);
    }

    /// Clear the buffer and reset the caret.
    pub fn clear(&mut self) {
        self.text.clear();
        self.start = 0;
        self.end = 0;
    }

    /// Collapse the selection and move the caret one character left.
    /// Returns true if the caret moved.
    pub fn move_left(&mut self) -> bool {
        if self.has_selection() {
            self.end = self.start;
            return true;
        }
        if self.start == 0 {
            return false;
        }
        self.set_cursor(self.start - 1);
        true
    }

    /// Collapse the selection and move the caret one character right.
    /// Returns true if the caret moved.
    pub fn move_right(&mut self) -> bool {
        if self.has_selection() {
            self.start = self.end;
            return true;
        }
        if self.end >= self.char_count() {
            return false;
        }
        self.set_cursor(self.end + 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_caret() {
        let mut buf = EditBuffer::new();
        buf.insert("سل");
        buf.insert("ام");
        assert_eq!(buf.text(), "سلام");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut buf = EditBuffer::from_text("abcdef");
        buf.set_selection(1, 4);
        buf.insert("X");
        assert_eq!(buf.text(), "aXef");
        assert_eq!(buf.selection(), (2, 2));
    }

    #[test]
    fn insert_in_middle_of_arabic_text() {
        let mut buf = EditBuffer::from_text("مرحبا");
        buf.set_cursor(2);
        buf.insert("ـ");
        assert_eq!(buf.text(), "مرـحبا");
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn backspace_deletes_previous_char() {
        let mut buf = EditBuffer::from_text("سلام");
        assert!(buf.backspace());
        assert_eq!(buf.text(), "سلا");
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut buf = EditBuffer::from_text("abc");
        buf.set_cursor(0);
        assert!(!buf.backspace());
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn backspace_deletes_selection() {
        let mut buf = EditBuffer::from_text("abcdef");
        buf.set_selection(4, 1);
        assert!(buf.backspace());
        assert_eq!(buf.text(), "aef");
        assert_eq!(buf.selection(), (1, 1));
    }

    #[test]
    fn lam_alif_takes_two_positions() {
        let mut buf = EditBuffer::new();
        buf.insert("لا");
        assert_eq!(buf.cursor(), 2);
        buf.backspace();
        assert_eq!(buf.text(), "ل");
    }

    #[test]
    fn selection_is_clamped() {
        let mut buf = EditBuffer::from_text("abc");
        buf.set_selection(10, 20);
        assert_eq!(buf.selection(), (3, 3));
    }

    #[test]
    fn caret_movement() {
        let mut buf = EditBuffer::from_text("ab");
        assert!(!buf.move_right());
        assert!(buf.move_left());
        assert!(buf.move_left());
        assert!(!buf.move_left());
        buf.select_all();
        assert!(buf.move_right());
        assert_eq!(buf.selection(), (2, 2));
    }

    #[test]
    fn counts() {
        let buf = EditBuffer::from_text("  أهلا  وسهلا \n");
        assert_eq!(buf.word_count(), 2);
        assert_eq!(EditBuffer::new().word_count(), 0);
    }
}
