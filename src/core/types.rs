use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::fuel::FuelCategory;
use super::quantity::{Comparison, Reconciliation};

/// Receipt file name → location. Built by the caller, read-only afterwards.
pub type ReceiptIndex = BTreeMap<String, PathBuf>;

/// Carta Porte complement generation a document was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CartaPorteVersion {
    /// Carta Porte 2.0: transported quantity on `Mercancia@Cantidad`.
    V20,
    /// Carta Porte 3.0: `CantidadTransporta` sub-node, attribute fallback.
    V30,
    /// Carta Porte 3.1: same layout as 3.0 under its own namespace.
    V31,
}

impl CartaPorteVersion {
    /// Detection priority order.
    pub const ALL: [Self; 3] = [Self::V20, Self::V30, Self::V31];

    /// Namespace URI of the complement.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::V20 => "http://www.sat.gob.mx/CartaPorte20",
            Self::V30 => "http://www.sat.gob.mx/CartaPorte30",
            Self::V31 => "http://www.sat.gob.mx/CartaPorte31",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::V20 => "2.0",
            Self::V30 => "3.0",
            Self::V31 => "3.1",
        }
    }
}

impl std::fmt::Display for CartaPorteVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartaPorte {}", self.label())
    }
}

/// Receipt (PDF) matched to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReceiptLink {
    /// Receipt file name present in the [`ReceiptIndex`].
    Found(String),
    #[default]
    NotFound,
}

impl ReceiptLink {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Found(name) => Some(name),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Data extracted from one Carta Porte document.
///
/// The extractor fills everything except `source_file` and `receipt`,
/// which the batch stamps afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRecord {
    /// Detected complement version.
    pub version: CartaPorteVersion,
    /// `Comprobante@Fecha`; `None` when missing or unparseable.
    pub emission_date: Option<NaiveDateTime>,
    /// Month number of the emission date, or empty.
    pub period: String,
    pub series: String,
    pub folio: String,
    /// `Mercancia@BienesTransp`; `None` when the goods node is missing.
    pub sat_key: Option<String>,
    /// Billed vs transported quantities and their verdict.
    #[serde(flatten)]
    pub quantities: Reconciliation,
    pub fuel: Option<FuelCategory>,
    /// File name of the source document.
    pub source_file: String,
    pub receipt: ReceiptLink,
}

impl ParsedRecord {
    pub fn comparison(&self) -> Comparison {
        self.quantities.comparison()
    }
}

/// A [`ParsedRecord`] as exposed in reports: the emission date is only used
/// for ordering and is dropped once rows are sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub version: CartaPorteVersion,
    pub period: String,
    pub series: String,
    pub folio: String,
    pub sat_key: Option<String>,
    #[serde(flatten)]
    pub quantities: Reconciliation,
    pub fuel: Option<FuelCategory>,
    pub source_file: String,
    pub receipt: ReceiptLink,
}

impl ReportRow {
    pub fn billed_quantity(&self) -> &str {
        self.quantities.billed()
    }

    pub fn transported_quantity(&self) -> &str {
        self.quantities.transported()
    }

    pub fn comparison(&self) -> Comparison {
        self.quantities.comparison()
    }
}

impl From<ParsedRecord> for ReportRow {
    fn from(record: ParsedRecord) -> Self {
        Self {
            version: record.version,
            period: record.period,
            series: record.series,
            folio: record.folio,
            sat_key: record.sat_key,
            quantities: record.quantities,
            fuel: record.fuel,
            source_file: record.source_file,
            receipt: record.receipt,
        }
    }
}
