use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        // Shifted characters already arrive as the shifted char
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }

    /// Parse vim-style notation: `<C-r>`, `<C-Enter>`, `<A-x>`, `<F5>`, `x`
    pub fn parse(notation: &str) -> Option<Self> {
        let inner = match notation.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            Some(inner) => inner,
            None => {
                let mut chars = notation.chars();
                let c = chars.next()?;
                return chars
                    .next()
                    .is_none()
                    .then(|| Self::new(KeyCode::Char(c), KeyModifiers::NONE));
            }
        };

        let mut modifiers = KeyModifiers::NONE;
        let mut parts: Vec<&str> = inner.split('-').collect();
        // `<C-->` binds the minus key
        if inner.ends_with("--") {
            parts.truncate(parts.len() - 2);
            parts.push("-");
        }
        let name = parts.pop()?;
        for part in parts {
            modifiers |= match part {
                "C" | "c" => KeyModifiers::CONTROL,
                "A" | "a" | "M" | "m" => KeyModifiers::ALT,
                "S" | "s" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let code = match name.to_ascii_lowercase().as_str() {
            "enter" | "cr" | "return" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "bs" | "backspace" => KeyCode::Backspace,
            lower => {
                if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    KeyCode::F(n)
                } else {
                    let mut chars = name.chars();
                    let c = chars.next()?;
                    if chars.next().is_some() {
                        return None;
                    }
                    KeyCode::Char(c)
                }
            }
        };

        Some(Self::new(code, modifiers))
    }
}

/// Scratchpad actions that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Save,
    Delete,
    Export,
    ToggleSelector,
    NewScript,
    ClearOutput,
    Quit,
}

impl Action {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "run" => Some(Action::Run),
            "save" => Some(Action::Save),
            "delete" => Some(Action::Delete),
            "export" | "download" => Some(Action::Export),
            "scripts" | "toggle_selector" => Some(Action::ToggleSelector),
            "new" => Some(Action::NewScript),
            "clear" => Some(Action::ClearOutput),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Global key bindings, checked before mode-specific keys
pub struct Keymap {
    bindings: HashMap<Key, Action>,
}

impl Keymap {
    pub fn new() -> Self {
        let bindings = HashMap::from([
            (Key::ctrl('r'), Action::Run),
            (Key::new(KeyCode::Enter, KeyModifiers::CONTROL), Action::Run),
            (Key::new(KeyCode::F(5), KeyModifiers::NONE), Action::Run),
            (Key::ctrl('s'), Action::Save),
            (Key::ctrl('d'), Action::Delete),
            (Key::ctrl('e'), Action::Export),
            (Key::ctrl('g'), Action::ToggleSelector),
            (Key::ctrl('n'), Action::NewScript),
            (Key::ctrl('l'), Action::ClearOutput),
            (Key::ctrl('q'), Action::Quit),
        ]);
        Self { bindings }
    }

    /// Defaults plus the `bind(key, action)` entries from config.
    /// Entries that do not parse are skipped with a warning.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut keymap = Self::new();
        for (notation, action_name) in overrides {
            match (Key::parse(notation), Action::from_name(action_name)) {
                (Some(key), Some(action)) => {
                    keymap.bindings.insert(key, action);
                }
                _ => tracing::warn!(key = %notation, action = %action_name, "ignoring invalid keybind"),
            }
        }
        keymap
    }

    pub fn lookup(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(&Key::from_event(event)).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parse_ctrl_char() {
        assert_eq!(Key::parse("<C-r>"), Some(Key::ctrl('r')));
    }

    #[test]
    fn parse_named_keys() {
        assert_eq!(
            Key::parse("<C-Enter>"),
            Some(Key::new(KeyCode::Enter, KeyModifiers::CONTROL))
        );
        assert_eq!(
            Key::parse("<F5>"),
            Some(Key::new(KeyCode::F(5), KeyModifiers::NONE))
        );
        assert_eq!(
            Key::parse("<A-x>"),
            Some(Key::new(KeyCode::Char('x'), KeyModifiers::ALT))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Key::parse("<X-r>"), None);
        assert_eq!(Key::parse("<C-abc>"), None);
        assert_eq!(Key::parse("ab"), None);
    }

    #[test]
    fn default_bindings_include_run_shortcuts() {
        let keymap = Keymap::new();
        assert_eq!(
            keymap.lookup(&press(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Run)
        );
        assert_eq!(
            keymap.lookup(&press(KeyCode::Enter, KeyModifiers::CONTROL)),
            Some(Action::Run)
        );
        assert_eq!(
            keymap.lookup(&press(KeyCode::Char('r'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn overrides_replace_and_extend_defaults() {
        let overrides = HashMap::from([
            ("<C-r>".to_string(), "save".to_string()),
            ("<F9>".to_string(), "run".to_string()),
            ("<C-z>".to_string(), "explode".to_string()),
        ]);
        let keymap = Keymap::with_overrides(&overrides);

        assert_eq!(
            keymap.lookup(&press(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Save)
        );
        assert_eq!(
            keymap.lookup(&press(KeyCode::F(9), KeyModifiers::NONE)),
            Some(Action::Run)
        );
        assert_eq!(
            keymap.lookup(&press(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn shift_is_folded_into_chars() {
        assert_eq!(
            Key::new(KeyCode::Char('R'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            Key::new(KeyCode::Char('R'), KeyModifiers::CONTROL)
        );
    }
}
