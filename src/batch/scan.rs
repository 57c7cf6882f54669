//! Directory scan: collects documents and indexes receipts by file name.

use glob::{Pattern, glob};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::BatchConfig;
use crate::core::{CartaPorteError, ReceiptIndex};

/// Documents to process and the receipts available for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchInputs {
    /// Document paths, sorted.
    pub documents: Vec<PathBuf>,
    pub receipts: ReceiptIndex,
}

/// Find every file below `dir` and sort it into documents and receipts.
///
/// Extensions are compared case-insensitively. Receipts are keyed by file
/// name only; when two subdirectories hold the same name, the path that
/// sorts last wins. Unreadable entries are logged and skipped.
pub fn collect_inputs(dir: &Path, config: &BatchConfig) -> Result<BatchInputs, CartaPorteError> {
    let metadata = fs::metadata(dir).map_err(|e| CartaPorteError::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(CartaPorteError::Io(format!("{}: not a directory", dir.display())));
    }
    let root = dir
        .to_str()
        .ok_or_else(|| CartaPorteError::Io(format!("{}: path is not valid UTF-8", dir.display())))?;
    let pattern = format!("{}/**/*", Pattern::escape(root.trim_end_matches('/')));

    let mut files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| CartaPorteError::Io(format!("{}: {e}", dir.display())))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut inputs = BatchInputs::default();
    for path in files {
        if has_extension(&path, &config.document_extension) {
            inputs.documents.push(path);
        } else if has_extension(&path, &config.receipt_extension) {
            if let Some(name) = path.file_name() {
                inputs.receipts.insert(name.to_string_lossy().into_owned(), path);
            }
        }
    }
    Ok(inputs)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
