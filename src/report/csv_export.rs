//! CSV rendering of report rows.
//!
//! One header line, then one line per row, CRLF-terminated. Fields are quoted
//! only when they contain the delimiter, a quote or a line break.

use super::ReportConfig;
use crate::core::ReportRow;

/// Column headers, in output order.
pub const COLUMNS: [&str; 10] = [
    "Periodo",
    "Serie",
    "Folio",
    "Clave SAT",
    "Cantidad Litros Facturada",
    "Litros Transportada",
    "Combustible",
    "Comparacion",
    "XML_File",
    "PDF Asociado",
];

/// Render rows as CSV.
pub fn to_csv(rows: &[ReportRow], config: &ReportConfig) -> String {
    let mut out = String::new();
    write_line(&mut out, config.delimiter, COLUMNS.iter().copied());
    for row in rows {
        let fuel = row.fuel.map(|f| f.label()).unwrap_or("");
        let receipt = row.receipt.name().unwrap_or(config.not_found_label.as_str());
        write_line(
            &mut out,
            config.delimiter,
            [
                row.period.as_str(),
                row.series.as_str(),
                row.folio.as_str(),
                row.sat_key.as_deref().unwrap_or(""),
                row.billed_quantity(),
                row.transported_quantity(),
                fuel,
                row.comparison().label(),
                row.source_file.as_str(),
                receipt,
            ],
        );
    }
    out
}

fn write_line<'a>(out: &mut String, delimiter: char, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        csv_field(out, field, delimiter);
    }
    out.push_str("\r\n");
}

fn csv_field(out: &mut String, value: &str, delimiter: char) {
    let needs_quotes = value
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\r' || c == '\n');
    if !needs_quotes {
        out.push_str(value);
        return;
    }
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}
