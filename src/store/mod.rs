//! Named script persistence
//!
//! Scripts are stored as plain strings in a key-value [`Storage`], one key per
//! script body, plus an index key listing the known names in insertion order.
//! The storage has no enumeration, so the index is the only way to list them.

mod scripts;
mod storage;

pub use scripts::ScriptStore;
pub use storage::{FileStorage, Storage};
#[cfg(test)]
pub use storage::{FlakyStorage, MemoryStorage};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("script name cannot be empty")]
    EmptyName,

    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage file {0} is not a JSON object of strings")]
    Corrupt(PathBuf),
}

pub type Result<T> = std::result::Result<T, StoreError>;
