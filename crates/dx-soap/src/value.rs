//! Generic hierarchical response values.
//!
//! The Data Exchange responses are loosely typed: nodes come and go with the
//! operation outcome, single children stand in for lists, and the payload
//! carries both attributes and text. [`SoapValue`] keeps that shape intact
//! and leaves interpretation to the caller, with lookups that tolerate
//! absence instead of failing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Result};

/// One node of a parsed service response.
///
/// Names are local names; namespace prefixes are dropped during parsing,
/// matching how the response payloads are consumed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoapValue {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<SoapValue>,
    text: Option<String>,
}

impl SoapValue {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The node's local name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the attribute with the given name, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The node's text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First child with the given name, if any.
    pub fn child(&self, name: &str) -> Option<&SoapValue> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Mutable access to the first child with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut SoapValue> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// All children with the given name, normalized to an iterator so a
    /// single occurrence and a repeated list read the same way.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SoapValue> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// All children, in document order.
    pub fn elements(&self) -> &[SoapValue] {
        &self.children
    }

    /// Whether a child with the given name exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Descend a path of child names.
    pub fn child_path(&self, path: &[&str]) -> Option<&SoapValue> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Remove and return the first child with the given name.
    pub fn remove_child(&mut self, name: &str) -> Option<SoapValue> {
        let index = self.children.iter().position(|child| child.name == name)?;
        Some(self.children.remove(index))
    }

    /// Whether the node carries no attributes, children or text.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }
}

/// Parse an XML document into a [`SoapValue`] tree.
///
/// Namespace declarations are dropped and element/attribute names are
/// reduced to their local part.
pub fn parse_document(xml: &str) -> Result<SoapValue> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<SoapValue> = Vec::new();
    let mut root: Option<SoapValue> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(node_from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let node = node_from_start(&start)?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| Error::new(ErrorKind::Xml(e.to_string())))?;
                append_text(&mut stack, &value);
            }
            Ok(Event::CData(data)) => {
                let bytes = data.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&bytes));
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or_else(|| {
                    Error::new(ErrorKind::Xml("unbalanced closing tag".to_string()))
                })?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::with_source(ErrorKind::Xml(e.to_string()), e)),
        }
    }

    root.ok_or_else(|| Error::new(ErrorKind::Xml("document has no root element".to_string())))
}

fn attach(stack: &mut [SoapValue], root: &mut Option<SoapValue>, node: SoapValue) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            root.get_or_insert(node);
        }
    }
}

fn append_text(stack: &mut [SoapValue], value: &str) {
    if value.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.text.get_or_insert_with(String::new).push_str(value);
    }
}

fn node_from_start(start: &BytesStart<'_>) -> Result<SoapValue> {
    let mut node = SoapValue::new(local_name(start.name().as_ref()));

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| Error::new(ErrorKind::Xml(e.to_string())))?;
        let raw_key = attribute.key.as_ref();
        if raw_key == b"xmlns".as_slice() || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::new(ErrorKind::Xml(e.to_string())))?;
        node.attributes
            .push((local_name(raw_key), value.into_owned()));
    }

    Ok(node)
}

fn local_name(raw: &[u8]) -> String {
    let local = raw.rsplit(|&byte| byte == b':').next().unwrap_or(raw);
    String::from_utf8_lossy(local).into_owned()
}
