use std::path::PathBuf;

use super::export::{ExportError, SCRIPT_EXTENSION, SCRIPT_MIME, export_script};
use super::{Buffer, Cursor, LineKind, Mode, OutputLog, ScriptSelector, SelectorEntry};
use crate::config::Settings;
use crate::scripting::{Executor, InitError, RunOutcome, Runtime};
use crate::store::{ScriptStore, Storage, StoreError};

pub struct Scratchpad<S: Storage, R: Runtime> {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub command_buffer: String,
    pub prompt_input: String,
    pub pending_delete: Option<String>,
    pub running: bool,
    pub message: Option<String>,
    pub selector: ScriptSelector,
    pub output: OutputLog,
    pub scroll_offset: usize,
    pub settings: Settings,
    store: ScriptStore<S>,
    executor: Executor<R>,
}

impl<S: Storage, R: Runtime> Scratchpad<S, R> {
    pub fn new(store: ScriptStore<S>, settings: Settings) -> Self {
        let mut pad = Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            mode: Mode::default(),
            command_buffer: String::new(),
            prompt_input: String::new(),
            pending_delete: None,
            running: true,
            message: None,
            selector: ScriptSelector::new(),
            output: OutputLog::new(),
            scroll_offset: 0,
            settings,
            store,
            executor: Executor::new(),
        };
        pad.refresh_selector();
        pad
    }

    pub fn runtime_ready(&self) -> bool {
        self.executor.is_ready()
    }

    /// Adjust scroll offset to keep cursor visible within viewport
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if self.cursor.line < self.scroll_offset {
            self.scroll_offset = self.cursor.line;
        }
        if viewport_height > 0 && self.cursor.line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor.line - viewport_height + 1;
        }
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Report a storage failure; nothing is retried
    fn storage_failed(&mut self, err: StoreError) {
        tracing::error!(error = %err, "script storage failed");
        self.output.push(LineKind::Error, &format!("Storage error: {}", err));
        self.set_message(format!("Storage error: {}", err));
    }

    // Runtime lifecycle

    pub fn runtime_starting(&mut self) {
        self.output.push(LineKind::Prompt, "Initializing runtime...");
    }

    /// Take the result of the asynchronous runtime startup
    pub fn runtime_initialized(&mut self, result: Result<R, InitError>) {
        match result {
            Ok(runtime) => {
                let name = runtime.name();
                if self.executor.attach(runtime) {
                    self.output.push(LineKind::Success, "Runtime ready!");
                    self.output.push(LineKind::Success, &name);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "runtime failed to start");
                self.output
                    .push(LineKind::Error, &format!("Error loading runtime: {}", e));
            }
        }
    }

    // Script selection

    pub fn refresh_selector(&mut self) {
        match self.store.list_names() {
            Ok(names) => self.selector.refresh(names),
            Err(e) => self.storage_failed(e),
        }
    }

    /// Load a stored script into the editor, or clear it for `None`
    pub fn select_script(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                match self.store.contains(name) {
                    Ok(true) => {}
                    Ok(false) => {
                        self.set_message(format!("No script named \"{}\"", name));
                        return;
                    }
                    Err(e) => return self.storage_failed(e),
                }
                match self.store.load(name) {
                    Ok(text) => self.buffer.set_text(&text),
                    Err(e) => return self.storage_failed(e),
                }
                self.selector.select(name);
            }
            None => {
                self.selector.clear_selection();
                self.buffer.set_text("");
            }
        }
        self.cursor = Cursor::new();
        self.scroll_offset = 0;
    }

    pub fn toggle_selector(&mut self) {
        if self.mode == Mode::Selector {
            self.mode = Mode::Normal;
        } else {
            self.refresh_selector();
            self.mode = Mode::Selector;
        }
    }

    pub fn choose_highlighted(&mut self) {
        match self.selector.highlighted_entry() {
            SelectorEntry::NewScript => self.select_script(None),
            SelectorEntry::Script(name) => self.select_script(Some(&name)),
        }
        self.mode = Mode::Normal;
    }

    // Actions

    /// Save under the selected name, or ask for one
    pub fn save(&mut self) {
        if self.buffer.is_blank() {
            self.set_message("Cannot save empty script.");
            return;
        }

        match self.selector.selected().map(str::to_string) {
            Some(name) => self.save_as(&name),
            None => {
                self.prompt_input.clear();
                self.mode = Mode::Prompt;
            }
        }
    }

    pub fn save_as(&mut self, name: &str) {
        if self.buffer.is_blank() {
            self.set_message("Cannot save empty script.");
            return;
        }

        let name = name.trim();
        if name.is_empty() {
            self.set_message("Script name cannot be empty.");
            return;
        }

        let text = self.buffer.text();
        if let Err(e) = self.store.save(name, text.trim()) {
            return self.storage_failed(e);
        }

        self.refresh_selector();
        self.selector.select(name);
        self.buffer.mark_clean();
        self.set_message("Script saved!");
    }

    /// An empty answer abandons the save; a whitespace-only one is rejected
    pub fn submit_prompt(&mut self) {
        let name = std::mem::take(&mut self.prompt_input);
        self.mode = Mode::Normal;
        if name.is_empty() {
            return;
        }
        self.save_as(&name);
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt_input.clear();
        self.mode = Mode::Normal;
    }

    pub fn run(&mut self) {
        let label = self.selector.selected().unwrap_or("code").to_string();
        let outcome = self.executor.run(&self.buffer.text());

        if !outcome.did_run() {
            self.output.push(LineKind::Error, &outcome.notice());
            return;
        }

        self.output.clear();
        self.output
            .push(LineKind::Prompt, &format!(">>> Running {}...", label));
        self.output.push(LineKind::Output, "");

        let kind = match &outcome {
            RunOutcome::Output(_) => LineKind::Output,
            RunOutcome::NoOutput => LineKind::Success,
            _ => LineKind::Error,
        };
        self.output.push(kind, &outcome.notice());
        tracing::debug!(script = %label, error = outcome.is_error(), "ran script");
    }

    /// Ask before deleting the selected script
    pub fn request_delete(&mut self) {
        match self.selector.selected().map(str::to_string) {
            Some(name) => {
                self.set_message(format!("Delete script \"{}\"? (y/n)", name));
                self.pending_delete = Some(name);
                self.mode = Mode::Confirm;
            }
            None => self.set_message("No script selected to delete."),
        }
    }

    pub fn confirm_delete(&mut self, confirmed: bool) {
        self.mode = Mode::Normal;
        let Some(name) = self.pending_delete.take() else {
            return;
        };
        if !confirmed {
            self.clear_message();
            return;
        }

        if let Err(e) = self.store.delete(&name) {
            return self.storage_failed(e);
        }

        let was_selected = self.selector.selected() == Some(name.as_str());
        self.refresh_selector();
        if was_selected {
            self.select_script(None);
        }
        self.set_message("Script deleted!");
    }

    /// Write the editor text to a file; needs no runtime
    pub fn export(&mut self, dir: Option<PathBuf>) {
        let dir = dir.unwrap_or_else(|| self.settings.export_dir());
        match export_script(
            &self.buffer.text(),
            &dir,
            self.selector.selected(),
            SCRIPT_EXTENSION,
        ) {
            Ok(path) => {
                self.set_message(format!("Exported to {} ({})", path.display(), SCRIPT_MIME))
            }
            Err(ExportError::Empty) => self.set_message(ExportError::Empty.to_string()),
            Err(e) => {
                self.output.push(LineKind::Error, &e.to_string());
                self.set_message(e.to_string());
            }
        }
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    // Commands

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
    }

    pub fn execute_command(&mut self) {
        let input = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.mode = Mode::Normal;

        let (cmd, arg) = match input.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (input.as_str(), None),
        };

        match (cmd, arg) {
            ("q" | "quit", _) => self.quit(),
            ("w" | "write", None) => self.save(),
            ("w" | "write", Some(name)) => self.save_as(name),
            ("r" | "run", _) => self.run(),
            ("d" | "delete", _) => self.request_delete(),
            ("export", dir) => self.export(dir.map(PathBuf::from)),
            ("clear", _) => self.clear_output(),
            ("new", _) => self.select_script(None),
            ("e" | "edit", Some(name)) => self.select_script(Some(name)),
            ("", _) => {}
            _ => self.set_message(format!("Unknown command: {}", input)),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // Cursor movement

    pub fn move_left(&mut self) {
        self.cursor.move_left();
    }

    pub fn move_right(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.move_right(line_len);
    }

    pub fn move_up(&mut self) {
        let buffer = &self.buffer;
        self.cursor.move_up(|l| buffer.line_len(l));
    }

    pub fn move_down(&mut self) {
        let buffer = &self.buffer;
        self.cursor
            .move_down(buffer.line_count(), |l| buffer.line_len(l));
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_to_line_end(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.set_col(line_len);
    }

    pub fn move_to_first_line(&mut self) {
        self.cursor = Cursor::new();
    }

    pub fn move_to_last_line(&mut self) {
        let line = self.buffer.line_count().saturating_sub(1);
        self.cursor = Cursor::at(line, 0);
    }

    // Mode changes

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
    }

    pub fn enter_normal_mode(&mut self) {
        self.mode = Mode::Normal;
        self.command_buffer.clear();
    }

    /// Open line below (o)
    pub fn open_line_below(&mut self) {
        self.move_to_line_end();
        self.insert_newline();
        self.enter_insert_mode();
    }

    // Text editing

    pub fn insert_char(&mut self, ch: char) {
        self.buffer
            .insert_char(self.cursor.line, self.cursor.col, ch);
        self.cursor.set_col(self.cursor.col + 1);
    }

    pub fn insert_tab(&mut self) {
        let spaces = " ".repeat(self.settings.tab_width);
        self.buffer
            .insert_str(self.cursor.line, self.cursor.col, &spaces);
        self.cursor.set_col(self.cursor.col + spaces.len());
    }

    pub fn delete_char_backward(&mut self) {
        if self.cursor.col > 0 {
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            // Join with previous line
            let prev_line_len = self.buffer.line_len(self.cursor.line - 1);
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor = Cursor::at(self.cursor.line - 1, prev_line_len);
        }
    }

    pub fn delete_char_under_cursor(&mut self) {
        if self.cursor.col < self.buffer.line_len(self.cursor.line) {
            self.buffer.delete_char(self.cursor.line, self.cursor.col);
        }
    }

    pub fn insert_newline(&mut self) {
        self.buffer
            .insert_newline(self.cursor.line, self.cursor.col);
        self.cursor = Cursor::at(self.cursor.line + 1, 0);
    }
}
