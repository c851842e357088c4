use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// MIME type reported for exported Rhai scripts
pub const SCRIPT_MIME: &str = "text/x-rhai";

/// Extension given to exported scripts, without the dot
pub const SCRIPT_EXTENSION: &str = "rhai";

const DEFAULT_STEM: &str = "script";

/// File name for an export: the selected script's name, or `script`, with
/// `extension` appended unless it is already there
pub fn export_filename(selected: Option<&str>, extension: &str) -> String {
    let stem = selected.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_STEM);
    let suffix = format!(".{extension}");
    if stem.ends_with(&suffix) {
        stem.to_string()
    } else {
        format!("{stem}{suffix}")
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No code to export.")]
    Empty,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write the trimmed script text into `dir`, returning the file written
pub fn export_script(
    text: &str,
    dir: &Path,
    selected: Option<&str>,
    extension: &str,
) -> Result<PathBuf, ExportError> {
    let code = text.trim();
    if code.is_empty() {
        return Err(ExportError::Empty);
    }

    let path = dir.join(export_filename(selected, extension));
    fs::write(&path, code).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), mime = SCRIPT_MIME, "exported script");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_defaults_to_script() {
        assert_eq!(export_filename(None, "rhai"), "script.rhai");
        assert_eq!(export_filename(Some(""), "rhai"), "script.rhai");
    }

    #[test]
    fn filename_appends_missing_extension() {
        assert_eq!(export_filename(Some("fizzbuzz"), "rhai"), "fizzbuzz.rhai");
        assert_eq!(export_filename(Some("notes.txt"), "rhai"), "notes.txt.rhai");
    }

    #[test]
    fn filename_keeps_existing_extension() {
        assert_eq!(export_filename(Some("a.rhai"), "rhai"), "a.rhai");
    }

    #[test]
    fn export_writes_trimmed_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_script("\n print(1); \n", dir.path(), Some("a"), "rhai").unwrap();
        assert_eq!(path, dir.path().join("a.rhai"));
        assert_eq!(fs::read_to_string(path).unwrap(), "print(1);");
    }

    #[test]
    fn export_rejects_blank_text() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_script("   ", dir.path(), None, "rhai").unwrap_err();
        assert!(matches!(err, ExportError::Empty));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
