use super::GOODS_ELEMENT;
use super::document::Document;
use crate::core::CartaPorteVersion;

/// Determine which Carta Porte complement a document carries.
///
/// Versions are tried in the order 2.0, 3.0, 3.1; the first one with a
/// `Mercancia` element in its namespace wins. Prefixes, `Version`
/// attributes and file names play no part.
pub fn detect_version(doc: &Document) -> Option<CartaPorteVersion> {
    CartaPorteVersion::ALL
        .into_iter()
        .find(|version| doc.find(version.namespace(), GOODS_ELEMENT).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse(&format!(
            r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
                 xmlns:cp20="http://www.sat.gob.mx/CartaPorte20"
                 xmlns:cp30="http://www.sat.gob.mx/CartaPorte30"
                 xmlns:cp31="http://www.sat.gob.mx/CartaPorte31">{body}</cfdi:Comprobante>"#
        ))
        .unwrap()
    }

    #[test]
    fn detects_each_version() {
        assert_eq!(
            detect_version(&doc("<cp20:Mercancia/>")),
            Some(CartaPorteVersion::V20)
        );
        assert_eq!(
            detect_version(&doc("<cp30:Mercancia/>")),
            Some(CartaPorteVersion::V30)
        );
        assert_eq!(
            detect_version(&doc("<cp31:Mercancia/>")),
            Some(CartaPorteVersion::V31)
        );
    }

    #[test]
    fn priority_order_wins() {
        assert_eq!(
            detect_version(&doc("<cp31:Mercancia/><cp30:Mercancia/>")),
            Some(CartaPorteVersion::V30)
        );
        assert_eq!(
            detect_version(&doc("<cp31:Mercancia/><cp20:Mercancia/>")),
            Some(CartaPorteVersion::V20)
        );
    }

    #[test]
    fn other_elements_in_namespace_do_not_count() {
        assert_eq!(detect_version(&doc("<cp31:CartaPorte Version=\"3.1\"/>")), None);
    }

    #[test]
    fn plain_invoice_is_unrecognized() {
        assert_eq!(detect_version(&doc("<cfdi:Conceptos/>")), None);
    }

    #[test]
    fn unknown_namespace_is_unrecognized() {
        let d = Document::parse(
            r#"<Root xmlns:cp="http://www.sat.gob.mx/CartaPorte40"><cp:Mercancia/></Root>"#,
        )
        .unwrap();
        assert_eq!(detect_version(&d), None);
    }
}
