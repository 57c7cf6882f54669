//! Quantity normalization and billed/transported reconciliation.
//!
//! Quantities arrive as attribute text. Anything that does not parse as a
//! finite number counts as zero; nothing in here returns an error.

use serde::{Deserialize, Serialize};

/// Absolute tolerance under which two quantities are considered equal.
pub const QUANTITY_TOLERANCE: f64 = 1e-9;

/// Parse a quantity attribute, falling back to `0.0` for absent, empty,
/// non-numeric or non-finite text.
pub fn parse_quantity(text: Option<&str>) -> f64 {
    text.map(str::trim)
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Render a quantity with exactly three fractional digits.
pub fn format_quantity(value: f64) -> String {
    format!("{value:.3}")
}

/// Outcome of comparing the billed and transported quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    Different,
}

impl Comparison {
    /// Compare two full-precision values within [`QUANTITY_TOLERANCE`].
    pub fn of(a: f64, b: f64) -> Self {
        if (a - b).abs() < QUANTITY_TOLERANCE {
            Self::Equal
        } else {
            Self::Different
        }
    }

    /// Label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "Iguales",
            Self::Different => "Diferentes",
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Billed and transported quantities formatted for display, plus the verdict.
///
/// Only [`reconcile`] builds one, so the verdict always matches the values it
/// was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    #[serde(rename = "billed_quantity")]
    billed: String,
    #[serde(rename = "transported_quantity")]
    transported: String,
    comparison: Comparison,
}

impl Reconciliation {
    /// Billed quantity, three decimals.
    pub fn billed(&self) -> &str {
        &self.billed
    }

    /// Transported quantity, three decimals.
    pub fn transported(&self) -> &str {
        &self.transported
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
}

/// Normalize both quantities, format them and compare the unrounded values.
///
/// Display rounding never feeds back into the verdict: `1.0004` and `1.0001`
/// both render as `"1.000"` yet compare [`Comparison::Different`].
pub fn reconcile(billed: Option<&str>, transported: Option<&str>) -> Reconciliation {
    let billed_value = parse_quantity(billed);
    let transported_value = parse_quantity(transported);
    Reconciliation {
        billed: format_quantity(billed_value),
        transported: format_quantity(transported_value),
        comparison: Comparison::of(billed_value, transported_value),
    }
}
