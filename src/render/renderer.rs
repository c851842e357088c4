use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::editor::{LineKind, Mode, Scratchpad, SelectorEntry};
use crate::scripting::Runtime;
use crate::store::Storage;
use crate::theme::{Color, Theme};

const GUTTER_WIDTH: u16 = 4;
const SELECTOR_WIDTH: u16 = 32;

/// Screen areas, top to bottom: selector bar, editor, output title,
/// output log, status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub editor_top: u16,
    pub editor_height: u16,
    pub output_title: u16,
    pub output_top: u16,
    pub output_height: u16,
    pub status_row: u16,
}

impl Layout {
    pub fn compute(height: u16, output_height: u16) -> Self {
        let status_row = height.saturating_sub(1);
        // Leave the editor at least a few rows on small terminals
        let output_height = output_height.min(height.saturating_sub(6) / 2);
        let output_top = status_row.saturating_sub(output_height);
        let output_title = output_top.saturating_sub(1);
        let editor_top = 1;

        Self {
            editor_top,
            editor_height: output_title.saturating_sub(editor_top),
            output_title,
            output_top,
            output_height,
            status_row,
        }
    }
}

pub struct Renderer {
    pub width: u16,
    pub height: u16,
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            width,
            height,
            keyboard_enhanced: false,
        })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;

        // Needed for Ctrl-Enter to be distinguishable from Enter
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )?;
            self.keyboard_enhanced = true;
        }
        Ok(())
    }

    pub fn teardown(&self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        execute!(
            stdout(),
            SetCursorStyle::DefaultUserShape,
            Show,
            EnableLineWrap,
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn layout(&self, output_height: u16) -> Layout {
        Layout::compute(self.height, output_height)
    }

    pub fn render<S: Storage, R: Runtime>(
        &self,
        pad: &Scratchpad<S, R>,
        theme: &Theme,
    ) -> io::Result<()> {
        let mut stdout = stdout();
        let layout = self.layout(pad.settings.output_height);

        // Hide cursor during redraw to prevent flicker
        queue!(stdout, Hide)?;

        self.render_selector_bar(&mut stdout, pad, theme)?;
        self.render_editor(&mut stdout, pad, &layout, theme)?;
        self.render_output(&mut stdout, pad, &layout, theme)?;
        if pad.mode == Mode::Selector {
            self.render_selector_list(&mut stdout, pad, &layout, theme)?;
        }
        self.render_status_line(&mut stdout, pad, &layout, theme)?;
        self.position_cursor(&mut stdout, pad, &layout)?;

        stdout.flush()?;
        Ok(())
    }

    /// Fit `text` into exactly `width` columns
    fn fit(text: &str, width: usize) -> String {
        format!("{:width$}", text, width = width)
            .chars()
            .take(width)
            .collect()
    }

    fn colors(stdout: &mut impl Write, fg: Color, bg: Color) -> io::Result<()> {
        queue!(
            stdout,
            SetForegroundColor(fg.to_crossterm()),
            SetBackgroundColor(bg.to_crossterm())
        )
    }

    fn render_selector_bar<S: Storage, R: Runtime>(
        &self,
        stdout: &mut impl Write,
        pad: &Scratchpad<S, R>,
        theme: &Theme,
    ) -> io::Result<()> {
        queue!(stdout, MoveTo(0, 0))?;
        Self::colors(stdout, theme.selector_fg, theme.selector_bg)?;

        let mut x = 0u16;
        for entry in pad.selector.entries() {
            let is_active = match pad.selector.selected() {
                Some(name) => entry.label() == name,
                None => entry == SelectorEntry::NewScript,
            };

            let text = if is_active {
                Self::colors(stdout, theme.selector_active_fg, theme.selector_active_bg)?;
                format!(" [{}] ", entry.label())
            } else {
                Self::colors(stdout, theme.selector_fg, theme.selector_bg)?;
                format!("  {}  ", entry.label())
            };

            let remaining = self.width.saturating_sub(x) as usize;
            if remaining == 0 {
                break;
            }
            let clipped: String = text.chars().take(remaining).collect();
            x += clipped.chars().count() as u16;
            queue!(stdout, Print(clipped))?;
        }

        // Fill remaining space
        Self::colors(stdout, theme.selector_fg, theme.selector_bg)?;
        if x < self.width {
            queue!(stdout, Print(" ".repeat((self.width - x) as usize)))?;
        }
        Ok(())
    }

    fn render_editor<S: Storage, R: Runtime>(
        &self,
        stdout: &mut impl Write,
        pad: &Scratchpad<S, R>,
        layout: &Layout,
        theme: &Theme,
    ) -> io::Result<()> {
        let line_count = pad.buffer.line_count();
        let gutter = if pad.settings.show_line_numbers {
            GUTTER_WIDTH
        } else {
            0
        };
        let text_width = self.width.saturating_sub(gutter) as usize;

        for row in 0..layout.editor_height {
            let line_idx = row as usize + pad.scroll_offset;
            queue!(stdout, MoveTo(0, layout.editor_top + row))?;

            if line_idx >= line_count {
                Self::colors(stdout, theme.line_number, theme.background)?;
                let filler = if gutter > 0 { "  ~ " } else { "" };
                queue!(stdout, Print(Self::fit(filler, self.width as usize)))?;
                continue;
            }

            if gutter > 0 {
                let is_cursor_line = line_idx == pad.cursor.line;
                let line_num = if is_cursor_line || !pad.settings.relative_line_numbers {
                    line_idx + 1
                } else {
                    line_idx.abs_diff(pad.cursor.line)
                };
                let color = if is_cursor_line {
                    theme.line_number_active
                } else {
                    theme.line_number
                };
                Self::colors(stdout, color, theme.background)?;
                queue!(stdout, Print(format!("{:>3} ", line_num)))?;
            }

            let content: String = pad.buffer.line(line_idx).chars().collect();
            let content = content.trim_end_matches('\n').replace('\t', " ");
            Self::colors(stdout, theme.foreground, theme.background)?;
            queue!(stdout, Print(Self::fit(&content, text_width)))?;
        }
        Ok(())
    }

    fn render_output<S: Storage, R: Runtime>(
        &self,
        stdout: &mut impl Write,
        pad: &Scratchpad<S, R>,
        layout: &Layout,
        theme: &Theme,
    ) -> io::Result<()> {
        let width = self.width as usize;

        queue!(stdout, MoveTo(0, layout.output_title))?;
        Self::colors(stdout, theme.border, theme.output_bg)?;
        queue!(stdout, SetAttribute(Attribute::Bold))?;
        let title = format!("─ Output {}", "─".repeat(width.saturating_sub(9)));
        queue!(stdout, Print(Self::fit(&title, width)))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;

        let lines = pad.output.tail(layout.output_height as usize);
        for row in 0..layout.output_height {
            queue!(stdout, MoveTo(0, layout.output_top + row))?;
            match lines.get(row as usize) {
                Some(line) => {
                    let fg = match line.kind {
                        LineKind::Prompt => theme.output_prompt,
                        LineKind::Output => theme.output_text,
                        LineKind::Success => theme.output_success,
                        LineKind::Error => theme.output_error,
                    };
                    Self::colors(stdout, fg, theme.output_bg)?;
                    queue!(stdout, Print(Self::fit(&line.text, width)))?;
                }
                None => {
                    Self::colors(stdout, theme.output_text, theme.output_bg)?;
                    queue!(stdout, Print(" ".repeat(width)))?;
                }
            }
        }
        Ok(())
    }

    fn render_selector_list<S: Storage, R: Runtime>(
        &self,
        stdout: &mut impl Write,
        pad: &Scratchpad<S, R>,
        layout: &Layout,
        theme: &Theme,
    ) -> io::Result<()> {
        let width = SELECTOR_WIDTH.min(self.width);
        let x = self.width - width;
        let rows = layout.editor_height;

        queue!(stdout, MoveTo(x, layout.editor_top))?;
        Self::colors(stdout, theme.foreground, theme.selector_bg)?;
        queue!(stdout, SetAttribute(Attribute::Bold))?;
        queue!(stdout, Print(Self::fit(" Scripts ", width as usize)))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;

        let entries = pad.selector.entries();
        // Scroll the list so the highlighted row stays visible
        let visible = rows.saturating_sub(1) as usize;
        let first = (pad.selector.highlighted + 1).saturating_sub(visible);

        for row in 1..rows {
            let idx = first + row as usize - 1;
            queue!(stdout, MoveTo(x, layout.editor_top + row))?;
            match entries.get(idx) {
                Some(entry) if idx == pad.selector.highlighted => {
                    Self::colors(stdout, theme.selector_active_fg, theme.selector_active_bg)?;
                    queue!(stdout, Print(Self::fit(&format!(" {}", entry.label()), width as usize)))?;
                }
                Some(entry) => {
                    Self::colors(stdout, theme.foreground, theme.selector_bg)?;
                    queue!(stdout, Print(Self::fit(&format!(" {}", entry.label()), width as usize)))?;
                }
                None => {
                    Self::colors(stdout, theme.foreground, theme.selector_bg)?;
                    queue!(stdout, Print(" ".repeat(width as usize)))?;
                }
            }
        }
        Ok(())
    }

    fn render_status_line<S: Storage, R: Runtime>(
        &self,
        stdout: &mut impl Write,
        pad: &Scratchpad<S, R>,
        layout: &Layout,
        theme: &Theme,
    ) -> io::Result<()> {
        queue!(stdout, MoveTo(0, layout.status_row))?;

        let prompt = match pad.mode {
            Mode::Command => Some(format!(":{}", pad.command_buffer)),
            Mode::Prompt => Some(format!("Enter a name for this script: {}", pad.prompt_input)),
            _ => None,
        };
        if let Some(prompt) = prompt {
            Self::colors(stdout, theme.foreground, theme.background)?;
            queue!(stdout, Clear(ClearType::CurrentLine))?;
            queue!(stdout, Print(prompt))?;
            return Ok(());
        }

        // Message - show prominently
        if let Some(ref msg) = pad.message {
            Self::colors(stdout, theme.warning, theme.background)?;
            queue!(stdout, Clear(ClearType::CurrentLine))?;
            queue!(stdout, Print(msg))?;
            return Ok(());
        }

        Self::colors(stdout, theme.status_bar_fg, theme.status_bar_bg)?;

        let name = pad.selector.selected().unwrap_or("[New Script]");
        let modified = if pad.buffer.is_dirty() { " [+]" } else { "" };
        let runtime = if pad.runtime_ready() {
            "ready"
        } else {
            "starting"
        };
        let left = format!(" {} | {}{} ", pad.mode.display(), name, modified);
        let right = format!(
            " runtime: {} | {}:{} ",
            runtime,
            pad.cursor.line + 1,
            pad.cursor.col + 1
        );

        let padding = (self.width as usize).saturating_sub(left.chars().count() + right.chars().count());
        let status = format!("{}{}{}", left, " ".repeat(padding), right);
        queue!(stdout, Print(Self::fit(&status, self.width as usize)))?;
        Ok(())
    }

    fn position_cursor<S: Storage, R: Runtime>(
        &self,
        stdout: &mut impl Write,
        pad: &Scratchpad<S, R>,
        layout: &Layout,
    ) -> io::Result<()> {
        match pad.mode {
            Mode::Command => {
                let col = 1 + pad.command_buffer.chars().count() as u16;
                queue!(stdout, MoveTo(col, layout.status_row), SetCursorStyle::BlinkingBar, Show)?;
            }
            Mode::Prompt => {
                let col = "Enter a name for this script: ".len() as u16
                    + pad.prompt_input.chars().count() as u16;
                queue!(stdout, MoveTo(col, layout.status_row), SetCursorStyle::BlinkingBar, Show)?;
            }
            Mode::Normal | Mode::Insert => {
                let gutter = if pad.settings.show_line_numbers {
                    GUTTER_WIDTH
                } else {
                    0
                };
                let x = gutter + pad.cursor.col as u16;
                let y = layout.editor_top + (pad.cursor.line.saturating_sub(pad.scroll_offset)) as u16;
                let style = match pad.mode {
                    Mode::Insert => SetCursorStyle::BlinkingBar,
                    _ => SetCursorStyle::SteadyBlock,
                };
                queue!(stdout, MoveTo(x, y), style, Show)?;
            }
            Mode::Selector | Mode::Confirm => queue!(stdout, Hide)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stacks_areas_without_overlap() {
        let layout = Layout::compute(40, 8);
        assert_eq!(layout.status_row, 39);
        assert_eq!(layout.output_height, 8);
        assert_eq!(layout.output_top, 31);
        assert_eq!(layout.output_title, 30);
        assert_eq!(layout.editor_top, 1);
        assert_eq!(layout.editor_height, 29);
    }

    #[test]
    fn layout_shrinks_output_on_small_terminals() {
        let layout = Layout::compute(12, 8);
        assert_eq!(layout.output_height, 3);
        assert!(layout.editor_height >= 3);
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(Renderer::fit("ab", 4), "ab  ");
        assert_eq!(Renderer::fit("abcdef", 3), "abc");
    }
}
