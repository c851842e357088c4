use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Action, Keymap};
use crate::editor::{Mode, Scratchpad};
use crate::scripting::Runtime;
use crate::store::Storage;

pub fn handle_event<S: Storage, R: Runtime>(
    pad: &mut Scratchpad<S, R>,
    keymap: &Keymap,
    event: Event,
) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            // Keep prompts visible while they are being answered
            if !matches!(pad.mode, Mode::Confirm | Mode::Prompt) {
                pad.clear_message();
            }
            handle_key(pad, keymap, key);
        }
        Event::Paste(text) if pad.mode == Mode::Insert => {
            for ch in text.chars() {
                match ch {
                    '\n' => pad.insert_newline(),
                    '\r' => {}
                    c => pad.insert_char(c),
                }
            }
        }
        _ => {}
    }
}

fn handle_key<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, keymap: &Keymap, key: KeyEvent) {
    if matches!(pad.mode, Mode::Normal | Mode::Insert | Mode::Selector) {
        if let Some(action) = keymap.lookup(&key) {
            return perform(pad, action);
        }
    }

    match pad.mode {
        Mode::Normal => handle_normal_mode(pad, key),
        Mode::Insert => handle_insert_mode(pad, key),
        Mode::Command => handle_command_mode(pad, key),
        Mode::Selector => handle_selector_mode(pad, key),
        Mode::Prompt => handle_prompt_mode(pad, key),
        Mode::Confirm => handle_confirm_mode(pad, key),
    }
}

pub fn perform<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, action: Action) {
    match action {
        Action::Run => pad.run(),
        Action::Save => pad.save(),
        Action::Delete => pad.request_delete(),
        Action::Export => pad.export(None),
        Action::ToggleSelector => pad.toggle_selector(),
        Action::NewScript => {
            pad.select_script(None);
            pad.mode = Mode::Normal;
        }
        Action::ClearOutput => pad.clear_output(),
        Action::Quit => pad.quit(),
    }
}

fn handle_selector_mode<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => pad.mode = Mode::Normal,
        KeyCode::Char('j') | KeyCode::Down => pad.selector.move_down(),
        KeyCode::Char('k') | KeyCode::Up => pad.selector.move_up(),
        KeyCode::Enter => pad.choose_highlighted(),
        _ => {}
    }
}

fn handle_normal_mode<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, key: KeyEvent) {
    match key.code {
        // Quick quit with Ctrl-C
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => pad.quit(),

        // Basic movement
        KeyCode::Char('h') | KeyCode::Left => pad.move_left(),
        KeyCode::Char('j') | KeyCode::Down => pad.move_down(),
        KeyCode::Char('k') | KeyCode::Up => pad.move_up(),
        KeyCode::Char('l') | KeyCode::Right => pad.move_right(),

        // Line motions
        KeyCode::Char('0') => pad.move_to_line_start(),
        KeyCode::Char('$') => pad.move_to_line_end(),
        KeyCode::Char('g') => pad.move_to_first_line(),
        KeyCode::Char('G') => pad.move_to_last_line(),

        KeyCode::Char('x') => pad.delete_char_under_cursor(),

        // Insert mode entry
        KeyCode::Char('i') => pad.enter_insert_mode(),
        KeyCode::Char('a') => {
            pad.move_right();
            pad.enter_insert_mode();
        }
        KeyCode::Char('A') => {
            pad.move_to_line_end();
            pad.enter_insert_mode();
        }
        KeyCode::Char('o') => pad.open_line_below(),

        KeyCode::Char(':') => pad.enter_command_mode(),

        _ => {}
    }
}

fn handle_insert_mode<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => pad.enter_normal_mode(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => pad.insert_char(c),
        KeyCode::Tab => pad.insert_tab(),
        KeyCode::Backspace => pad.delete_char_backward(),
        KeyCode::Enter => pad.insert_newline(),

        KeyCode::Left => pad.move_left(),
        KeyCode::Right => pad.move_right(),
        KeyCode::Up => pad.move_up(),
        KeyCode::Down => pad.move_down(),

        _ => {}
    }
}

fn handle_command_mode<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => pad.enter_normal_mode(),
        KeyCode::Enter => pad.execute_command(),
        KeyCode::Backspace => {
            pad.command_buffer.pop();
            if pad.command_buffer.is_empty() {
                pad.enter_normal_mode();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            pad.command_buffer.push(c)
        }
        _ => {}
    }
}

fn handle_prompt_mode<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => pad.cancel_prompt(),
        KeyCode::Enter => pad.submit_prompt(),
        KeyCode::Backspace => {
            pad.prompt_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            pad.prompt_input.push(c)
        }
        _ => {}
    }
}

fn handle_confirm_mode<S: Storage, R: Runtime>(pad: &mut Scratchpad<S, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => pad.confirm_delete(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => pad.confirm_delete(false),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::scripting::EchoRuntime;
    use crate::store::{MemoryStorage, ScriptStore};

    fn pad() -> Scratchpad<MemoryStorage, EchoRuntime> {
        let mut pad = Scratchpad::new(ScriptStore::new(MemoryStorage::new()), Settings::default());
        pad.runtime_initialized(Ok(EchoRuntime::new()));
        pad
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(pad: &mut Scratchpad<MemoryStorage, EchoRuntime>, keymap: &Keymap, s: &str) {
        for c in s.chars() {
            handle_event(pad, keymap, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_in_insert_mode_edits_buffer() {
        let keymap = Keymap::new();
        let mut pad = pad();
        handle_event(&mut pad, &keymap, key(KeyCode::Char('i')));
        type_str(&mut pad, &keymap, "hey");
        handle_event(&mut pad, &keymap, key(KeyCode::Esc));
        assert_eq!(pad.buffer.text(), "hey");
        assert_eq!(pad.mode, Mode::Normal);
    }

    #[test]
    fn ctrl_enter_runs_from_insert_mode() {
        let keymap = Keymap::new();
        let mut pad = pad();
        handle_event(&mut pad, &keymap, key(KeyCode::Char('i')));
        type_str(&mut pad, &keymap, "out");
        handle_event(
            &mut pad,
            &keymap,
            Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL)),
        );
        assert_eq!(pad.buffer.text(), "out");
        assert_eq!(pad.output.lines().last().map(|l| l.text.as_str()), Some("out"));
    }

    #[test]
    fn save_prompt_flow_names_script() {
        let keymap = Keymap::new();
        let mut pad = pad();
        pad.buffer.set_text("body");

        handle_event(&mut pad, &keymap, ctrl('s'));
        assert_eq!(pad.mode, Mode::Prompt);
        type_str(&mut pad, &keymap, "first");
        handle_event(&mut pad, &keymap, key(KeyCode::Enter));

        assert_eq!(pad.selector.selected(), Some("first"));
        assert_eq!(pad.message.as_deref(), Some("Script saved!"));
    }

    #[test]
    fn confirm_mode_only_deletes_on_yes() {
        let keymap = Keymap::new();
        let mut pad = pad();
        pad.buffer.set_text("body");
        pad.save_as("victim");

        handle_event(&mut pad, &keymap, ctrl('d'));
        handle_event(&mut pad, &keymap, key(KeyCode::Char('x')));
        assert_eq!(pad.mode, Mode::Confirm);
        handle_event(&mut pad, &keymap, key(KeyCode::Char('y')));

        assert_eq!(pad.mode, Mode::Normal);
        assert_eq!(pad.selector.selected(), None);
    }

    #[test]
    fn selector_picks_script_into_editor() {
        let keymap = Keymap::new();
        let mut pad = pad();
        pad.buffer.set_text("one");
        pad.save_as("a");
        pad.select_script(None);

        handle_event(&mut pad, &keymap, ctrl('g'));
        assert_eq!(pad.mode, Mode::Selector);
        handle_event(&mut pad, &keymap, key(KeyCode::Char('j')));
        handle_event(&mut pad, &keymap, key(KeyCode::Enter));

        assert_eq!(pad.mode, Mode::Normal);
        assert_eq!(pad.buffer.text(), "one");
    }

    #[test]
    fn control_chords_do_not_type_into_prompt_or_command_line() {
        let keymap = Keymap::new();
        let mut pad = pad();
        pad.buffer.set_text("body");

        handle_event(&mut pad, &keymap, ctrl('s'));
        assert_eq!(pad.mode, Mode::Prompt);
        type_str(&mut pad, &keymap, "ab");
        handle_event(&mut pad, &keymap, ctrl('c'));
        assert_eq!(pad.prompt_input, "ab");
        handle_event(&mut pad, &keymap, key(KeyCode::Esc));

        handle_event(&mut pad, &keymap, key(KeyCode::Char(':')));
        handle_event(&mut pad, &keymap, ctrl('w'));
        type_str(&mut pad, &keymap, "clear");
        assert_eq!(pad.command_buffer, "clear");
    }

    #[test]
    fn command_mode_runs_colon_commands() {
        let keymap = Keymap::new();
        let mut pad = pad();
        handle_event(&mut pad, &keymap, key(KeyCode::Char(':')));
        type_str(&mut pad, &keymap, "q");
        handle_event(&mut pad, &keymap, key(KeyCode::Enter));
        assert!(!pad.running);
    }
}
