#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Prompt,
    Output,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

/// Append-only log shown under the editor
#[derive(Debug, Default)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`, one log line per text line
    pub fn push(&mut self, kind: LineKind, text: &str) {
        let text = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            self.lines.push(OutputLine {
                kind,
                text: String::new(),
            });
            return;
        }
        for line in text.split('\n') {
            self.lines.push(OutputLine {
                kind,
                text: line.trim_end_matches('\r').to_string(),
            });
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    /// The last `n` lines, for a panel that only fits that many
    pub fn tail(&self, n: usize) -> &[OutputLine] {
        &self.lines[self.lines.len().saturating_sub(n)..]
    }
}
