/// Cursor position in the editor buffer.
///
/// `want_col` remembers the column to return to when vertical movement
/// passes through shorter lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    want_col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            want_col: col,
        }
    }

    /// Set the column from a horizontal motion or edit
    pub fn set_col(&mut self, col: usize) {
        self.col = col;
        self.want_col = col;
    }

    pub fn move_left(&mut self) {
        self.set_col(self.col.saturating_sub(1));
    }

    pub fn move_right(&mut self, line_len: usize) {
        self.set_col((self.col + 1).min(line_len));
    }

    /// Move up one line; `line_len` maps a line index to its length
    pub fn move_up(&mut self, line_len: impl Fn(usize) -> usize) {
        if self.line > 0 {
            self.line -= 1;
            self.col = self.want_col.min(line_len(self.line));
        }
    }

    pub fn move_down(&mut self, line_count: usize, line_len: impl Fn(usize) -> usize) {
        if self.line + 1 < line_count {
            self.line += 1;
            self.col = self.want_col.min(line_len(self.line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_left_stops_at_zero() {
        let mut cursor = Cursor::new();
        cursor.move_left();
        assert_eq!(cursor.col, 0);
    }

    #[test]
    fn move_right_clamps_to_line_len() {
        let mut cursor = Cursor::at(0, 9);
        cursor.move_right(10);
        cursor.move_right(10);
        assert_eq!(cursor.col, 10);
    }

    #[test]
    fn vertical_motion_remembers_column() {
        let lens = [12, 2, 12];
        let mut cursor = Cursor::at(0, 10);

        cursor.move_down(3, |l| lens[l]);
        assert_eq!((cursor.line, cursor.col), (1, 2));

        cursor.move_down(3, |l| lens[l]);
        assert_eq!((cursor.line, cursor.col), (2, 10));

        cursor.move_down(3, |l| lens[l]);
        assert_eq!(cursor.line, 2);
    }

    #[test]
    fn move_up_stops_at_first_line() {
        let mut cursor = Cursor::new();
        cursor.move_up(|_| 5);
        assert_eq!(cursor, Cursor::new());
    }
}
