use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, extracting or exporting Carta Porte data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CartaPorteError {
    /// Malformed, truncated or non-UTF-8 XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// File or directory access failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Report or bundle generation failed.
    #[error("report error: {0}")]
    Report(String),
}

impl CartaPorteError {
    pub(crate) fn io(path: &std::path::Path, e: std::io::Error) -> Self {
        Self::Io(format!("{}: {e}", path.display()))
    }
}

/// A document the batch could not process, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Path of the offending document.
    pub path: PathBuf,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl DocumentFailure {
    /// Record a failure for `path`.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
