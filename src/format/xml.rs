//! Small helpers around `roxmltree` for the vendor XML formats.
//!
//! The lookups only ever consider direct children, which is how the
//! FluoView documents are structured.

use std::path::Path;
use std::str::FromStr;

use roxmltree::Node;

use crate::error::{FormatError, IoError, ParseError};
use crate::io::{decode_utf16, has_utf16_bom, read_file};

/// XML namespaces used by Olympus FluoView files.
pub mod ns {
    /// XML Schema instance namespace (for `xsi:type`)
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

    pub const BASE: &str = "http://www.olympus.co.jp/hpf/model/base";
    pub const COMMONFRAME: &str = "http://www.olympus.co.jp/hpf/model/commonframe";
    pub const COMMONIMAGE: &str = "http://www.olympus.co.jp/hpf/model/commonimage";
    pub const COMMONPARAM: &str = "http://www.olympus.co.jp/hpf/model/commonparam";
    pub const MARKER: &str = "http://www.olympus.co.jp/hpf/model/marker";
    pub const MATL: &str = "http://www.olympus.co.jp/hpf/protocol/matl/model/matl";
}

/// An element name: optional namespace URI and local name.
pub type XmlName = (Option<&'static str>, &'static str);

fn describe(name: XmlName) -> String {
    match name.0 {
        Some(uri) => format!("{{{}}}{}", uri, name.1),
        None => name.1.to_string(),
    }
}

fn is_named(node: &Node<'_, '_>, name: XmlName) -> bool {
    node.is_element() && node.tag_name().name() == name.1 && node.tag_name().namespace() == name.0
}

/// Find the first direct child element with the given name.
pub fn child<'a, 'input>(
    node: Node<'a, 'input>,
    name: XmlName,
) -> Result<Node<'a, 'input>, ParseError> {
    node.children()
        .find(|c| is_named(c, name))
        .ok_or_else(|| ParseError::MissingElement(describe(name)))
}

/// Iterate over all direct child elements with the given name.
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: XmlName,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |c| is_named(c, name))
}

/// Get the (trimmed) text content of a direct child element.
///
/// An element without text yields an empty string.
pub fn child_text<'a>(node: Node<'a, '_>, name: XmlName) -> Result<&'a str, ParseError> {
    Ok(child(node, name)?.text().unwrap_or("").trim())
}

/// Get the text content of a direct child element and parse it into `T`.
pub fn child_parse<T: FromStr>(node: Node<'_, '_>, name: XmlName) -> Result<T, ParseError> {
    let text = child_text(node, name)?;
    text.parse().map_err(|_| ParseError::InvalidValue {
        field: describe(name),
        value: text.to_string(),
    })
}

/// Get a required attribute.
pub fn attribute<'a>(node: Node<'a, '_>, name: XmlName) -> Result<&'a str, ParseError> {
    let value = match name.0 {
        Some(uri) => node.attribute((uri, name.1)),
        None => node.attribute(name.1),
    };
    value.ok_or_else(|| ParseError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: describe(name),
    })
}

/// Get the `xsi:type` attribute of an element.
pub fn xsi_type<'a>(node: Node<'a, '_>) -> Result<&'a str, ParseError> {
    attribute(node, (Some(ns::XSI), "type"))
}

/// The source text of an element, for diagnostics.
pub fn source_text<'a>(node: Node<'_, 'a>) -> &'a str {
    &node.document().input_text()[node.range()]
}

/// Read an XML file as text.
///
/// FluoView writes its project files as UTF-8 (or ASCII); UTF-16 files with
/// a byte order mark are accepted as well.
pub fn read_xml_text(path: &Path) -> Result<String, FormatError> {
    let bytes = read_file(path)?;
    if has_utf16_bom(&bytes) {
        return Ok(decode_utf16(&bytes)?);
    }
    let text = String::from_utf8(bytes).map_err(|e| {
        IoError::Decode(format!("{} is not valid UTF-8: {}", path.display(), e))
    })?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}
