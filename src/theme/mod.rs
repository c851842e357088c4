mod colors;
mod theme;

pub use colors::Color;
pub use theme::Theme;

pub fn list_builtin_themes() -> Vec<&'static str> {
    vec!["gruvbox-dark", "nord", "dracula"]
}

pub fn get_builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "gruvbox-dark" => Some(Theme::gruvbox_dark()),
        "nord" => Some(Theme::nord()),
        "dracula" => Some(Theme::dracula()),
        _ => None,
    }
}

/// Theme by name, falling back to the default for unknown names
pub fn resolve_theme(name: &str) -> Theme {
    get_builtin_theme(name).unwrap_or_else(|| {
        tracing::warn!(theme = name, available = ?list_builtin_themes(), "unknown theme");
        Theme::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in list_builtin_themes() {
            assert_eq!(get_builtin_theme(name).map(|t| t.name), Some(name.to_string()));
        }
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(resolve_theme("neon").name, "gruvbox-dark");
    }
}
