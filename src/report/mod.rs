//! Tabular report and download bundle.
//!
//! Turns the rows of a batch into:
//! - a CSV table (`to_csv`)
//! - billed/transported totals, overall and per fuel (`summarize`)
//! - a bundle plan: the table plus every matched receipt (`build_bundle`)
//! - a JSON array of rows (`to_json`, feature `json`)
//!
//! Writing the archive itself is left to the caller.
//!
//! # Example
//!
//! ```ignore
//! use cartaporte::report::*;
//!
//! let config = ReportConfig::default();
//! let bundle = build_bundle(&outcome.rows, &outcome.receipts, &config).unwrap();
//! // bundle.spreadsheet — CSV content, saved as bundle.spreadsheet_name
//! // bundle.receipts — (file name, location) of each matched receipt
//! ```

mod csv_export;
mod summary;

pub use csv_export::{COLUMNS, to_csv};
pub use summary::{FuelTotals, QuantityTotals, ReportSummary, summarize};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::{CartaPorteError, ReceiptIndex, ReportRow};

/// Configuration for report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// File name of the table inside the bundle.
    pub spreadsheet_name: String,
    /// Text shown in place of a receipt name when none was matched.
    pub not_found_label: String,
    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            spreadsheet_name: "datos_procesados.csv".into(),
            not_found_label: "No encontrado".into(),
            delimiter: ',',
        }
    }
}

/// Everything that belongs in the download archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBundle {
    pub spreadsheet_name: String,
    /// CSV content of the table.
    pub spreadsheet: String,
    /// Matched receipts as (file name, location), in row order.
    pub receipts: Vec<(String, PathBuf)>,
}

/// Unique matched receipt names, in order of first appearance.
pub fn associated_receipts(rows: &[ReportRow]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for name in rows.iter().filter_map(|r| r.receipt.name()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Assemble the table and matched receipts for download.
///
/// Receipts marked as matched but missing from `receipts` are left out.
pub fn build_bundle(
    rows: &[ReportRow],
    receipts: &ReceiptIndex,
    config: &ReportConfig,
) -> Result<ReportBundle, CartaPorteError> {
    if rows.is_empty() {
        return Err(CartaPorteError::Report("no rows to export".into()));
    }

    let files = associated_receipts(rows)
        .into_iter()
        .filter_map(|name| {
            receipts
                .get(name)
                .map(|location| (name.to_string(), location.clone()))
        })
        .collect();

    Ok(ReportBundle {
        spreadsheet_name: config.spreadsheet_name.clone(),
        spreadsheet: to_csv(rows, config),
        receipts: files,
    })
}

/// Render rows as a pretty-printed JSON array.
#[cfg(feature = "json")]
pub fn to_json(rows: &[ReportRow]) -> Result<String, CartaPorteError> {
    serde_json::to_string_pretty(rows)
        .map_err(|e| CartaPorteError::Report(format!("JSON serialization failed: {e}")))
}
