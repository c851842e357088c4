use std::collections::HashMap;
use std::path::PathBuf;

/// Scratchpad settings that can be customized via Rhai config
#[derive(Debug, Clone)]
pub struct Settings {
    // Display
    pub theme: String,
    pub show_line_numbers: bool,
    pub relative_line_numbers: bool,
    pub tab_width: usize,
    pub output_height: u16, // Rows given to the output log

    // Runtime
    pub max_operations: u64,
    pub max_expr_depth: usize,
    pub prelude: Option<PathBuf>, // Script run once when the runtime starts

    // Export target, defaults to the working directory
    pub export_dir: Option<PathBuf>,

    // Custom keybinds: key notation -> action name
    pub keybinds: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "gruvbox-dark".to_string(),
            show_line_numbers: true,
            relative_line_numbers: false,
            tab_width: 4,
            output_height: 8,

            max_operations: 1_000_000,
            max_expr_depth: 64,
            prelude: None,

            export_dir: None,

            keybinds: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
