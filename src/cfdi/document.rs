//! Namespace-resolved element tree built with quick-xml's `NsReader`.
//!
//! Elements are identified by (namespace URI, local name), never by prefix,
//! so `cp31:Mercancia` and `cartaporte31:Mercancia` are the same element as
//! long as both prefixes are bound to the same URI.

use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Reader};
use std::borrow::Cow;

use crate::core::CartaPorteError;

/// Maximum element nesting accepted by the parser.
pub const MAX_DEPTH: usize = 256;

/// An XML element with its resolved namespace, attributes and children.
/// Text content is not kept; CFDI carries its data in attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn open(namespace: Option<String>, start: &BytesStart<'_>) -> Result<Self, CartaPorteError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr
                .map_err(|e| CartaPorteError::Xml(format!("bad attribute on <{name}>: {e}")))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| CartaPorteError::Xml(format!("bad value for {name}@{key}: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            namespace,
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Namespace URI, `None` for elements outside any namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Local name (without prefix).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by its name as written (`Fecha`, `xsi:schemaLocation`).
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Whether this element is `local` in namespace `ns`.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.name == local && self.namespace.as_deref() == Some(ns)
    }

    /// First descendant (document order, excluding `self`) named `local`
    /// in namespace `ns`.
    pub fn find(&self, ns: &str, local: &str) -> Option<&Element> {
        let mut stack = vec![self.children.iter()];
        while let Some(level) = stack.last_mut() {
            match level.next() {
                Some(child) if child.is(ns, local) => return Some(child),
                Some(child) => stack.push(child.children.iter()),
                None => {
                    stack.pop();
                }
            }
        }
        None
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from text. A leading byte-order mark is ignored.
    pub fn parse(xml: &str) -> Result<Self, CartaPorteError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (ns, event) = match reader.read_resolved_event() {
                Ok(pair) => pair,
                Err(e) => return Err(CartaPorteError::Xml(format!("XML parse error: {e}"))),
            };
            let namespace = resolve_namespace(ns)?;

            match event {
                Event::Start(ref e) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(CartaPorteError::Xml(format!(
                            "elements nested deeper than {MAX_DEPTH}"
                        )));
                    }
                    stack.push(Element::open(namespace, e)?);
                }
                Event::Empty(ref e) => {
                    let element = Element::open(namespace, e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CartaPorteError::Xml("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CartaPorteError::Xml(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        root.map(|root| Self { root })
            .ok_or_else(|| CartaPorteError::Xml("document has no root element".into()))
    }

    /// Parse a document from raw bytes.
    ///
    /// A byte-order mark selects the encoding; otherwise the `encoding` of the
    /// XML declaration does, defaulting to UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CartaPorteError> {
        let xml = decode(bytes)?;
        Self::parse(&xml)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// First element below the root named `local` in namespace `ns`.
    pub fn find(&self, ns: &str, local: &str) -> Option<&Element> {
        self.root.find(ns, local)
    }
}

fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, CartaPorteError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            CartaPorteError::Xml(format!("document is not valid {}", encoding.name()))
        })
}

/// Encoding named in the XML declaration, if there is one.
///
/// A declaration readable as ASCII cannot be UTF-16, so a UTF-16 label there
/// is read as UTF-8.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>, CartaPorteError> {
    let mut reader = Reader::from_reader(bytes);
    let Ok(Event::Decl(decl)) = reader.read_event() else {
        return Ok(None);
    };
    match decl.encoding() {
        None => Ok(None),
        Some(Ok(label)) => Encoding::for_label(&label)
            .map(|encoding| Some(encoding.output_encoding()))
            .ok_or_else(|| {
                CartaPorteError::Xml(format!(
                    "unsupported encoding '{}'",
                    String::from_utf8_lossy(&label)
                ))
            }),
        Some(Err(e)) => Err(CartaPorteError::Xml(format!("bad XML declaration: {e}"))),
    }
}

fn resolve_namespace(ns: ResolveResult<'_>) -> Result<Option<String>, CartaPorteError> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(String::from_utf8_lossy(uri).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(CartaPorteError::Xml(format!(
            "unbound namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CartaPorteError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(CartaPorteError::Xml(format!(
                "second root element <{}>",
                element.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS_A: &str = "urn:test:a";
    const NS_B: &str = "urn:test:b";

    #[test]
    fn resolves_namespaces_by_uri_not_prefix() {
        let doc = Document::parse(
            r#"<a:Root xmlns:a="urn:test:a" xmlns:x="urn:test:b">
                 <x:Item Cantidad="1"/>
                 <a:Item Cantidad="2"/>
               </a:Root>"#,
        )
        .unwrap();
        assert!(doc.root().is(NS_A, "Root"));
        assert_eq!(doc.find(NS_B, "Item").unwrap().attr("Cantidad"), Some("1"));
        assert_eq!(doc.find(NS_A, "Item").unwrap().attr("Cantidad"), Some("2"));
    }

    #[test]
    fn default_namespace_applies_to_elements() {
        let doc = Document::parse(r#"<Root xmlns="urn:test:a"><Item/></Root>"#).unwrap();
        assert!(doc.find(NS_A, "Item").is_some());
    }

    #[test]
    fn find_is_depth_first_document_order() {
        let doc = Document::parse(
            r#"<r:Root xmlns:r="urn:test:a">
                 <r:Group><r:Deep><r:Item n="1"/></r:Deep></r:Group>
                 <r:Item n="2"/>
               </r:Root>"#,
        )
        .unwrap();
        assert_eq!(doc.find(NS_A, "Item").unwrap().attr("n"), Some("1"));
    }

    #[test]
    fn find_excludes_self() {
        let doc = Document::parse(r#"<r:Item xmlns:r="urn:test:a"/>"#).unwrap();
        assert!(doc.find(NS_A, "Item").is_none());
    }

    #[test]
    fn attributes_unescaped_and_bindings_skipped() {
        let doc = Document::parse(r#"<Root xmlns:a="urn:test:a" Serie="A&amp;B"/>"#).unwrap();
        assert_eq!(doc.root().attr("Serie"), Some("A&B"));
        assert_eq!(doc.root().attr("xmlns:a"), None);
    }

    #[test]
    fn bom_is_ignored() {
        let doc = Document::from_bytes("\u{feff}<Root/>".as_bytes()).unwrap();
        assert_eq!(doc.root().name(), "Root");
    }

    #[test]
    fn declared_latin1_is_decoded() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><Root Descripcion="DI"#.to_vec();
        bytes.extend_from_slice(b"\xC9SEL\"/>");
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.root().attr("Descripcion"), Some("DIÉSEL"));
    }

    #[test]
    fn utf16_with_bom_is_decoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<Root Serie=\"Ñ\"/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.root().attr("Serie"), Some("Ñ"));
    }

    #[test]
    fn utf16_label_on_ascii_declaration_reads_as_utf8() {
        let doc =
            Document::from_bytes("<?xml version=\"1.0\" encoding=\"UTF-16\"?><Root Serie=\"Ñ\"/>".as_bytes())
                .unwrap();
        assert_eq!(doc.root().attr("Serie"), Some("Ñ"));
    }

    #[test]
    fn undecodable_documents_error() {
        assert!(Document::from_bytes(br#"<?xml version="1.0" encoding="x-unknown"?><Root/>"#).is_err());
        assert!(Document::from_bytes(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><Root A=\"\xC9\"/>").is_err());
    }

    #[test]
    fn malformed_documents_error() {
        assert!(Document::parse("").is_err());
        assert!(Document::parse("<Root>").is_err());
        assert!(Document::parse("<Root></Other>").is_err());
        assert!(Document::parse("<Root/><Root/>").is_err());
        assert!(Document::parse("<p:Root/>").is_err());
        assert!(Document::from_bytes(&[0x3c, 0xff, 0xfe]).is_err());
    }

    #[test]
    fn nesting_limit() {
        let xml = format!("{}{}", "<a>".repeat(MAX_DEPTH + 1), "</a>".repeat(MAX_DEPTH + 1));
        assert!(Document::parse(&xml).is_err());
        let xml = format!("{}{}", "<a>".repeat(10), "</a>".repeat(10));
        assert!(Document::parse(&xml).is_ok());
    }
}
