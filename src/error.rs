//! Error type shared by the parser, the document model, and the file
//! boundary wrappers.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while parsing, querying, or writing a
/// VEX document.
///
/// Parse-time variants carry the 1-based physical line number at which
/// the problem was detected. A malformed document fails the whole parse;
/// there is no recovery.
#[derive(Debug, Error)]
pub enum VexError {
    /// A logical line that should be an entry does not follow the entry
    /// grammar (missing `=`, or a `ref` declaration without exactly one
    /// `$` in its key).
    #[error("grammar error at line {line}: {msg}")]
    Grammar { line: usize, msg: String },

    /// A block delimiter appeared where the nesting state forbids it, or
    /// a block was left open at end of input.
    #[error("nesting error at line {line}: {msg}")]
    Nesting { line: usize, msg: String },

    /// Lookup of a key that is not present in the container.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// Refused to overwrite an existing file without explicit permission.
    #[error("destination already exists: {}", .path.display())]
    DestinationExists { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VexError {
    pub(crate) fn grammar(line: usize, msg: impl Into<String>) -> Self {
        VexError::Grammar {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn nesting(line: usize, msg: impl Into<String>) -> Self {
        VexError::Nesting {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn key_not_found(key: impl Into<String>) -> Self {
        VexError::KeyNotFound { key: key.into() }
    }
}
