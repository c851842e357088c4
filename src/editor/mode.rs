#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
    /// Picking a script from the selector list
    Selector,
    /// Typing a name for a new script
    Prompt,
    /// Waiting for y/n before deleting
    Confirm,
}

impl Mode {
    pub fn display(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Selector => "SCRIPTS",
            Mode::Prompt => "NAME",
            Mode::Confirm => "CONFIRM",
        }
    }
}
