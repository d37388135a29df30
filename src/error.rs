//! Error types for the kakko transpiler.

use thiserror::Error;

/// Main error type for kakko.
#[derive(Debug, Error)]
pub enum KakkoError {
    /// A storage-qualified global carries more than one initializer `=` in a
    /// shape the splitter cannot interpret. Passing it through unqualified
    /// would emit a duplicate symbol definition, so this aborts the file.
    #[error("Malformed global initializer at line {line}: {text}")]
    MalformedGlobal { line: usize, text: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KakkoError>;
