use ropey::Rope;

/// Text of the script being edited
pub struct Buffer {
    text: Rope,
    dirty: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            dirty: false,
        }
    }

    /// Create a buffer from a string (useful for testing)
    #[cfg(test)]
    pub fn from_text(s: &str) -> Self {
        Self {
            text: Rope::from_str(s),
            dirty: false,
        }
    }

    /// Replace the whole text, e.g. when another script is selected
    pub fn set_text(&mut self, s: &str) {
        self.text = Rope::from_str(s);
        self.dirty = false;
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Whether there is anything but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn line(&self, idx: usize) -> ropey::RopeSlice<'_> {
        self.text.line(idx)
    }

    pub fn line_len(&self, idx: usize) -> usize {
        // Length excluding newline character
        let line = self.text.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        self.text.line_to_char(line) + col
    }

    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert_char(idx, ch);
        self.dirty = true;
    }

    pub fn insert_str(&mut self, line: usize, col: usize, s: &str) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert(idx, s);
        self.dirty = true;
    }

    /// Delete the character at the given position
    pub fn delete_char(&mut self, line: usize, col: usize) {
        let idx = self.line_col_to_char(line, col);
        if idx < self.text.len_chars() {
            self.text.remove(idx..idx + 1);
            self.dirty = true;
        }
    }

    /// Delete the character before the given position (backspace)
    pub fn delete_char_backward(&mut self, line: usize, col: usize) -> bool {
        let idx = self.line_col_to_char(line, col);
        if idx == 0 {
            return false;
        }
        self.text.remove(idx - 1..idx);
        self.dirty = true;
        true
    }

    pub fn insert_newline(&mut self, line: usize, col: usize) {
        self.insert_char(line, col, '\n');
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
