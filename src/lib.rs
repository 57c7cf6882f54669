//! # cartaporte
//!
//! Extraction and reconciliation of fuel-transport data from Mexican CFDI 4.0
//! invoices carrying a Carta Porte complement (versions 2.0, 3.0 and 3.1).
//!
//! For each document the crate detects the complement version, reads the
//! billed quantity (invoice line) and the transported quantity (goods
//! declaration), classifies the fuel by its SAT key, and flags documents where
//! the two quantities disagree. Batches pair each document with its PDF
//! receipt and come out sorted by emission date.
//!
//! ## Quick Start
//!
//! ```rust
//! use cartaporte::{Comparison, FuelCategory, cfdi};
//!
//! let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
//!     xmlns:cartaporte31="http://www.sat.gob.mx/CartaPorte31"
//!     Fecha="2024-06-15T12:00:00" Serie="T" Folio="1001">
//!   <cfdi:Conceptos><cfdi:Concepto Cantidad="50.5"/></cfdi:Conceptos>
//!   <cfdi:Complemento>
//!     <cartaporte31:Mercancia BienesTransp="15101505" Cantidad="50.5">
//!       <cartaporte31:CantidadTransporta Cantidad="50.0"/>
//!     </cartaporte31:Mercancia>
//!   </cfdi:Complemento>
//! </cfdi:Comprobante>"#;
//!
//! let record = cfdi::parse_document(xml).unwrap().unwrap();
//! assert_eq!(record.fuel, Some(FuelCategory::Diesel));
//! assert_eq!(record.quantities.billed(), "50.500");
//! assert_eq!(record.quantities.transported(), "50.000");
//! assert_eq!(record.comparison(), Comparison::Different);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, CFDI parsing, batch processing |
//! | `report` | CSV table, totals per fuel, download bundle |
//! | `json` | JSON rendering of report rows |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod cfdi;

#[cfg(feature = "core")]
pub mod batch;

#[cfg(feature = "report")]
pub mod report;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
