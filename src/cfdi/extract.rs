use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::document::{Document, Element};
use super::{
    CFDI_NAMESPACE, GOODS_ELEMENT, LINE_ITEM_ELEMENT, TRANSPORT_QUANTITY_ELEMENT, detect_version,
};
use crate::core::{
    CartaPorteError, CartaPorteVersion, ParsedRecord, ReceiptLink, fuel_category, reconcile,
};

/// `Fecha` shapes accepted besides RFC 3339 and a bare date.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Fields read from the `Comprobante` root, identical for every version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonFields {
    pub emission_date: Option<NaiveDateTime>,
    /// Month number of `emission_date`, empty when there is no date.
    pub period: String,
    pub series: String,
    pub folio: String,
}

/// Parse an ISO-8601 emission date. Unparseable text yields `None`.
///
/// Offsets are accepted but dropped: the wall-clock time as written is kept.
pub fn parse_emission_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read date, period, series and folio from the document root.
pub fn extract_common(root: &Element) -> CommonFields {
    let emission_date = root.attr("Fecha").and_then(parse_emission_date);
    CommonFields {
        emission_date,
        period: emission_date
            .map(|d| d.month().to_string())
            .unwrap_or_default(),
        series: root.attr("Serie").unwrap_or_default().to_string(),
        folio: root.attr("Folio").unwrap_or_default().to_string(),
    }
}

/// Locate the transported quantity on a `Mercancia` node.
///
/// 2.0 keeps it on the node itself. 3.0 and 3.1 prefer a nested
/// `CantidadTransporta` in the same namespace and fall back to the node's own
/// attribute; a `CantidadTransporta` from another version's namespace is
/// ignored.
fn transported_quantity(goods: &Element, version: CartaPorteVersion) -> Option<&str> {
    // TODO: confirm the 3.x fallback order against the SAT complement guide for
    // documents that carry several CantidadTransporta entries.
    match version {
        CartaPorteVersion::V20 => goods.attr("Cantidad"),
        CartaPorteVersion::V30 | CartaPorteVersion::V31 => {
            match goods.find(version.namespace(), TRANSPORT_QUANTITY_ELEMENT) {
                Some(node) => node.attr("Cantidad"),
                None => goods.attr("Cantidad"),
            }
        }
    }
}

/// Extract a record from a document already known to be `version`.
///
/// Missing nodes leave their fields at defaults: no `Concepto` means a billed
/// quantity of zero, no `Mercancia` means no SAT key, no fuel and a
/// transported quantity of zero. `source_file` and `receipt` are left for the
/// caller to fill.
pub fn extract_record(doc: &Document, version: CartaPorteVersion) -> ParsedRecord {
    let root = doc.root();
    let common = extract_common(root);

    let billed = doc
        .find(CFDI_NAMESPACE, LINE_ITEM_ELEMENT)
        .and_then(|concepto| concepto.attr("Cantidad"));

    let goods = doc.find(version.namespace(), GOODS_ELEMENT);
    let sat_key = goods.map(|g| g.attr("BienesTransp").unwrap_or_default().to_string());
    let transported = goods.and_then(|g| transported_quantity(g, version));
    let fuel = sat_key.as_deref().and_then(fuel_category);

    ParsedRecord {
        version,
        emission_date: common.emission_date,
        period: common.period,
        series: common.series,
        folio: common.folio,
        sat_key,
        quantities: reconcile(billed, transported),
        fuel,
        source_file: String::new(),
        receipt: ReceiptLink::NotFound,
    }
}

/// Parse, detect and extract in one go.
///
/// Returns `Ok(None)` for well-formed documents that carry none of the
/// supported Carta Porte complements.
pub fn parse_document(xml: &str) -> Result<Option<ParsedRecord>, CartaPorteError> {
    let doc = Document::parse(xml)?;
    Ok(detect_version(&doc).map(|version| extract_record(&doc, version)))
}

/// Like [`parse_document`], from raw bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Option<ParsedRecord>, CartaPorteError> {
    let doc = Document::from_bytes(bytes)?;
    Ok(detect_version(&doc).map(|version| extract_record(&doc, version)))
}
