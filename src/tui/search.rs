use unicode_width::UnicodeWidthStr;

/// Search input state for the TUI
pub struct SearchState {
    pub query: String,
    /// Byte offset into `query`, always on a char boundary
    pub cursor_pos: usize,
    pub focused: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
            focused: true,
        }
    }
}

impl SearchState {
    pub fn with_query(query: String) -> Self {
        let cursor_pos = query.len();
        Self {
            query,
            cursor_pos,
            focused: true,
        }
    }

    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    /// Returns whether the query changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.query.remove(prev);
        self.cursor_pos = prev;
        true
    }

    /// Returns whether the query changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.query.len() {
            return false;
        }
        self.query.remove(self.cursor_pos);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.cursor_pos = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
        }
    }

    pub fn home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Returns whether there was anything to clear.
    pub fn clear(&mut self) -> bool {
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.cursor_pos = 0;
        true
    }

    /// Display columns between the start of the query and the cursor
    pub fn cursor_column(&self) -> u16 {
        self.query[..self.cursor_pos].width() as u16
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}
