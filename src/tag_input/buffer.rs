use std::cmp;

/// Single-line text buffer backing the tag input field.
///
/// Cursor positions are in characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
    scroll_col: usize, // Horizontal scroll (column offset)
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(content: &str) -> Self {
        // Newlines have no meaning in a single-line field
        let text: String = content.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            scroll_col: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_col(&self) -> usize {
        self.scroll_col
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut chars: Vec<char> = self.text.chars().collect();
        let col = cmp::min(self.cursor, chars.len());
        chars.insert(col, ch);
        self.text = chars.into_iter().collect();
        self.cursor = col + 1;
    }

    /// Delete the character before the cursor. Returns false at the start of the buffer.
    pub fn delete_char(&mut self) -> bool {
        let mut chars: Vec<char> = self.text.chars().collect();
        let col = cmp::min(self.cursor, chars.len());
        if col == 0 {
            return false;
        }
        chars.remove(col - 1);
        self.text = chars.into_iter().collect();
        self.cursor = col - 1;
        true
    }

    /// Delete the character under the cursor. Returns false at the end of the buffer.
    pub fn delete_forward(&mut self) -> bool {
        let mut chars: Vec<char> = self.text.chars().collect();
        if self.cursor >= chars.len() {
            return false;
        }
        chars.remove(self.cursor);
        self.text = chars.into_iter().collect();
        true
    }

    /// Delete from the start of the previous word up to the cursor
    pub fn delete_word_before(&mut self) -> bool {
        let end = cmp::min(self.cursor, self.len_chars());
        self.move_word_left();
        let start = self.cursor;
        if start == end {
            return false;
        }
        let mut chars: Vec<char> = self.text.chars().collect();
        chars.drain(start..end);
        self.text = chars.into_iter().collect();
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len_chars() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len_chars();
    }

    pub fn move_word_left(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = cmp::min(self.cursor, chars.len());

        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        // Punctuation run counts as its own word
        if pos == cmp::min(self.cursor, chars.len()) {
            while pos > 0 && !chars[pos - 1].is_whitespace() && !is_word_char(chars[pos - 1]) {
                pos -= 1;
            }
        }

        self.cursor = pos;
    }

    pub fn move_word_right(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = cmp::min(self.cursor, chars.len());

        while pos < chars.len() && is_word_char(chars[pos]) {
            pos += 1;
        }
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }

        self.cursor = pos;
    }

    /// Empty the buffer and hand back what it held
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.scroll_col = 0;
        std::mem::take(&mut self.text)
    }

    /// Keep the cursor inside a viewport of `width` columns
    pub fn update_horizontal_scroll(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        if self.cursor < self.scroll_col {
            self.scroll_col = self.cursor;
        } else if self.cursor >= self.scroll_col + width {
            self.scroll_col = self.cursor + 1 - width;
        }
    }

    /// The slice of text currently inside the viewport
    pub fn visible_text(&self, width: usize) -> String {
        self.text.chars().skip(self.scroll_col).take(width).collect()
    }

    /// Cursor column relative to the viewport, if it is visible
    pub fn visible_cursor(&self, width: usize) -> Option<usize> {
        let col = self.cursor.checked_sub(self.scroll_col)?;
        (col <= width).then_some(col)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}
