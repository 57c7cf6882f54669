//! Batch processing of Carta Porte documents.
//!
//! Every document is read, detected and extracted on its own. A document that
//! fails never stops the batch: it is logged and listed in
//! [`BatchOutcome::failures`]. Documents without a supported complement are
//! listed in [`BatchOutcome::unrecognized`] and produce no row.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cartaporte::batch::{BatchConfig, process_directory};
//!
//! let outcome = process_directory(Path::new("uploads/"), &BatchConfig::default()).unwrap();
//! for row in &outcome.rows {
//!     println!("{} {} {}", row.source_file, row.billed_quantity(), row.comparison());
//! }
//! ```

mod scan;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::cfdi;
use crate::core::{
    CartaPorteError, DocumentFailure, ParsedRecord, ReceiptIndex, ReceiptLink, ReportRow,
};

pub use scan::{BatchInputs, collect_inputs};

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Extension of Carta Porte documents (without dot).
    pub document_extension: String,
    /// Extension of receipts matched to documents by file stem.
    pub receipt_extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            document_extension: "xml".into(),
            receipt_extension: "pdf".into(),
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// One row per extracted document, ordered by emission date with
    /// undated documents last.
    pub rows: Vec<ReportRow>,
    /// Well-formed documents without a supported complement.
    pub unrecognized: Vec<PathBuf>,
    /// Documents that could not be read or parsed.
    pub failures: Vec<DocumentFailure>,
    /// The receipt index the batch ran against, unchanged.
    pub receipts: ReceiptIndex,
}

/// Find the receipt for a document: same file stem, receipt extension.
pub fn identify_receipt(
    document_name: &str,
    receipts: &ReceiptIndex,
    config: &BatchConfig,
) -> ReceiptLink {
    let stem = Path::new(document_name)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| document_name.into());
    let receipt_name = format!("{stem}.{}", config.receipt_extension);
    if receipts.contains_key(&receipt_name) {
        ReceiptLink::Found(receipt_name)
    } else {
        ReceiptLink::NotFound
    }
}

/// Read and extract a single document file.
pub fn process_document(path: &Path) -> Result<Option<ParsedRecord>, CartaPorteError> {
    let bytes = std::fs::read(path).map_err(|e| CartaPorteError::io(path, e))?;
    cfdi::parse_bytes(&bytes)
}

/// Process documents in order, match receipts, and sort the rows.
pub fn process_documents<P: AsRef<Path>>(
    paths: &[P],
    receipts: ReceiptIndex,
    config: &BatchConfig,
) -> BatchOutcome {
    info!(documents = paths.len(), receipts = receipts.len(), "processing batch");

    let mut records = Vec::with_capacity(paths.len());
    let mut unrecognized = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match process_document(path) {
            Ok(Some(mut record)) => {
                record.source_file = file_name(path);
                record.receipt = identify_receipt(&record.source_file, &receipts, config);
                debug!(
                    path = %path.display(),
                    version = %record.version,
                    comparison = %record.comparison(),
                    "extracted document"
                );
                records.push(record);
            }
            Ok(None) => {
                debug!(path = %path.display(), "no Carta Porte complement, skipping");
                unrecognized.push(path.to_path_buf());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to process document");
                failures.push(DocumentFailure::new(path, e.to_string()));
            }
        }
    }

    let rows = sort_records(records);
    info!(
        rows = rows.len(),
        unrecognized = unrecognized.len(),
        failures = failures.len(),
        "batch finished"
    );

    BatchOutcome {
        rows,
        unrecognized,
        failures,
        receipts,
    }
}

/// Scan `dir` and process everything found in it.
///
/// The directory is only read. Callers that unpack uploads into a scratch
/// directory keep ownership of it (e.g. a `tempfile::TempDir`).
pub fn process_directory(dir: &Path, config: &BatchConfig) -> Result<BatchOutcome, CartaPorteError> {
    let inputs = collect_inputs(dir, config)?;
    Ok(process_documents(&inputs.documents, inputs.receipts, config))
}

/// Order records by emission date, undated last, then drop the date.
/// Ties keep their input order.
pub fn sort_records(mut records: Vec<ParsedRecord>) -> Vec<ReportRow> {
    records.sort_by_key(|r| (r.emission_date.is_none(), r.emission_date));
    records.into_iter().map(ReportRow::from).collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
