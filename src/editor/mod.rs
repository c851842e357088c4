mod buffer;
mod cursor;
mod export;
mod mode;
mod output;
mod scratchpad;
mod selector;

pub use buffer::Buffer;
pub use cursor::Cursor;
pub use mode::Mode;
pub use output::{LineKind, OutputLog};
pub use scratchpad::Scratchpad;
pub use selector::{ScriptSelector, SelectorEntry};
