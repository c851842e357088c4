/// One row of the script selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEntry {
    /// Sentinel row: start a fresh, unnamed script
    NewScript,
    Script(String),
}

impl SelectorEntry {
    pub fn label(&self) -> &str {
        match self {
            SelectorEntry::NewScript => "New Script",
            SelectorEntry::Script(name) => name,
        }
    }
}

/// Script picker: the sentinel plus one row per stored name.
///
/// `selected` is the script currently loaded in the editor; `highlighted`
/// is the row under the selector cursor while the list is open.
#[derive(Debug, Default)]
pub struct ScriptSelector {
    names: Vec<String>,
    pub highlighted: usize,
    selected: Option<String>,
}

impl ScriptSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the rows from the store's index, keeping the selection if
    /// the name still exists
    pub fn refresh(&mut self, names: Vec<String>) {
        self.names = names;
        if let Some(current) = &self.selected {
            if !self.names.contains(current) {
                self.selected = None;
            }
        }
        self.highlight_selected();
    }

    pub fn entries(&self) -> Vec<SelectorEntry> {
        std::iter::once(SelectorEntry::NewScript)
            .chain(self.names.iter().cloned().map(SelectorEntry::Script))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len() + 1
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a stored name; unknown names leave the selection alone
    pub fn select(&mut self, name: &str) -> bool {
        if !self.names.iter().any(|n| n == name) {
            return false;
        }
        self.selected = Some(name.to_string());
        self.highlight_selected();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.highlighted = 0;
    }

    /// Point the list cursor at the selected row
    pub fn highlight_selected(&mut self) {
        self.highlighted = self
            .selected
            .as_ref()
            .and_then(|s| self.names.iter().position(|n| n == s))
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    pub fn move_up(&mut self) {
        if self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.len() {
            self.highlighted += 1;
        }
    }

    /// Entry under the list cursor
    pub fn highlighted_entry(&self) -> SelectorEntry {
        match self.highlighted {
            0 => SelectorEntry::NewScript,
            i => self
                .names
                .get(i - 1)
                .cloned()
                .map(SelectorEntry::Script)
                .unwrap_or(SelectorEntry::NewScript),
        }
    }
}
