use super::Color;

/// Colors for every element the scratchpad draws
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Editor
    pub background: Color,
    pub foreground: Color,
    pub line_number: Color,
    pub line_number_active: Color,

    // Status and selector bars
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub selector_bg: Color,
    pub selector_fg: Color,
    pub selector_active_bg: Color,
    pub selector_active_fg: Color,

    // Output log
    pub output_bg: Color,
    pub output_text: Color,
    pub output_prompt: Color,
    pub output_success: Color,
    pub output_error: Color,

    pub border: Color,
    pub warning: Color,
}

impl Theme {
    /// Gruvbox Dark - warm retro theme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            background: Color::rgb(0x28, 0x28, 0x28),
            foreground: Color::rgb(0xeb, 0xdb, 0xb2),
            line_number: Color::rgb(0x66, 0x5c, 0x54),
            line_number_active: Color::rgb(0xfa, 0xbd, 0x2f),

            status_bar_bg: Color::rgb(0x3c, 0x38, 0x36),
            status_bar_fg: Color::rgb(0xeb, 0xdb, 0xb2),
            selector_bg: Color::rgb(0x1d, 0x20, 0x21),
            selector_fg: Color::rgb(0xa8, 0x99, 0x84),
            selector_active_bg: Color::rgb(0xfe, 0x80, 0x19),
            selector_active_fg: Color::rgb(0x28, 0x28, 0x28),

            output_bg: Color::rgb(0x1d, 0x20, 0x21),
            output_text: Color::rgb(0xeb, 0xdb, 0xb2),
            output_prompt: Color::rgb(0x83, 0xa5, 0x98),
            output_success: Color::rgb(0xb8, 0xbb, 0x26),
            output_error: Color::rgb(0xfb, 0x49, 0x34),

            border: Color::rgb(0x50, 0x49, 0x45),
            warning: Color::rgb(0xfa, 0xbd, 0x2f),
        }
    }

    /// Nord - arctic, north-bluish color palette
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: Color::rgb(0x2e, 0x34, 0x40),
            foreground: Color::rgb(0xd8, 0xde, 0xe9),
            line_number: Color::rgb(0x4c, 0x56, 0x6a),
            line_number_active: Color::rgb(0xd8, 0xde, 0xe9),

            status_bar_bg: Color::rgb(0x3b, 0x42, 0x52),
            status_bar_fg: Color::rgb(0xd8, 0xde, 0xe9),
            selector_bg: Color::rgb(0x2e, 0x34, 0x40),
            selector_fg: Color::rgb(0x4c, 0x56, 0x6a),
            selector_active_bg: Color::rgb(0x88, 0xc0, 0xd0),
            selector_active_fg: Color::rgb(0x2e, 0x34, 0x40),

            output_bg: Color::rgb(0x24, 0x29, 0x33),
            output_text: Color::rgb(0xd8, 0xde, 0xe9),
            output_prompt: Color::rgb(0x81, 0xa1, 0xc1),
            output_success: Color::rgb(0xa3, 0xbe, 0x8c),
            output_error: Color::rgb(0xbf, 0x61, 0x6a),

            border: Color::rgb(0x4c, 0x56, 0x6a),
            warning: Color::rgb(0xeb, 0xcb, 0x8b),
        }
    }

    /// Dracula - dark theme with vibrant colors
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            background: Color::rgb(0x28, 0x2a, 0x36),
            foreground: Color::rgb(0xf8, 0xf8, 0xf2),
            line_number: Color::rgb(0x62, 0x72, 0xa4),
            line_number_active: Color::rgb(0xf8, 0xf8, 0xf2),

            status_bar_bg: Color::rgb(0x44, 0x47, 0x5a),
            status_bar_fg: Color::rgb(0xf8, 0xf8, 0xf2),
            selector_bg: Color::rgb(0x21, 0x22, 0x2c),
            selector_fg: Color::rgb(0x62, 0x72, 0xa4),
            selector_active_bg: Color::rgb(0xbd, 0x93, 0xf9),
            selector_active_fg: Color::rgb(0x28, 0x2a, 0x36),

            output_bg: Color::rgb(0x21, 0x22, 0x2c),
            output_text: Color::rgb(0xf8, 0xf8, 0xf2),
            output_prompt: Color::rgb(0x8b, 0xe9, 0xfd),
            output_success: Color::rgb(0x50, 0xfa, 0x7b),
            output_error: Color::rgb(0xff, 0x55, 0x55),

            border: Color::rgb(0x44, 0x47, 0x5a),
            warning: Color::rgb(0xf1, 0xfa, 0x8c),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}
