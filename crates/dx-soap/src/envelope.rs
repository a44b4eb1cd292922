//! Outbound SOAP envelope assembly.
//!
//! Envelopes are built as a small mutable element tree instead of a one-shot
//! string so that pre-send hooks can rework the document after the
//! declarative builder has produced it. The `Parameters` block of the
//! Data Exchange operations needs exactly that: repeated elements carrying
//! `Name`/`Value` attributes at a nesting depth the builder does not reach.

use tracing::debug;

use crate::xml;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// A mutable XML element used for outbound envelope assembly.
///
/// Attribute and child order is preserved; serialization escapes attribute
/// values and text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: Option<String>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create an element holding only text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.into());
        element
    }

    /// Append an attribute, builder style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a child element, builder style.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// The element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First child with the given name, if any.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Mutable access to the first child with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Mutable access to the first child with the given name, creating an
    /// empty one when absent.
    pub fn child_mut_or_insert(&mut self, name: &str) -> &mut XmlElement {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.children.push(XmlElement::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Serialize this element and its subtree.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&xml::escape(value));
            out.push('"');
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&xml::escape(text));
        }
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Mutation applied to the operation element after the declarative builder
/// has produced it and before the envelope is serialized.
pub trait EnvelopeHook {
    /// Rework the operation element in place.
    fn apply(&self, operation: &mut XmlElement);
}

/// A SOAP 1.1 envelope around a single operation element.
#[derive(Debug, Clone)]
pub struct Envelope {
    operation: XmlElement,
    namespace: String,
}

impl Envelope {
    /// Create an envelope for the given operation in the given namespace.
    pub fn new(operation_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            operation: XmlElement::new(operation_name),
            namespace: namespace.into(),
        }
    }

    /// Append a field to the operation element, builder style.
    pub fn with_field(mut self, field: XmlElement) -> Self {
        self.operation.push_child(field);
        self
    }

    /// Mutable access to the operation element.
    pub fn operation_mut(&mut self) -> &mut XmlElement {
        &mut self.operation
    }

    /// Run a pre-send hook over the operation element.
    pub fn apply(&mut self, hook: &dyn EnvelopeHook) {
        hook.apply(&mut self.operation);
    }

    /// Serialize the full envelope.
    pub fn to_xml(&self) -> String {
        let mut operation = self.operation.clone();
        operation.set_attr("xmlns", &self.namespace);
        format!(
            "{XML_DECLARATION}<soap:Envelope xmlns:soap=\"{SOAP_ENVELOPE_NS}\"><soap:Body>{}</soap:Body></soap:Envelope>",
            operation.to_xml()
        )
    }
}

/// Appends caller-supplied parameters to an outbound envelope.
///
/// The service expects `<Parameter Name=".." Value=".."/>` entries inside a
/// `Parameters` container that is nested one level inside itself under the
/// operation element. The injector locates that inner container, builds the
/// nesting when absent, and appends one entry per parameter in caller order.
/// Injected elements carry no prefix and inherit the operation element's
/// default namespace.
#[derive(Debug, Clone, Default)]
pub struct ParameterInjector {
    parameters: Vec<(String, String)>,
}

impl ParameterInjector {
    /// Create an injector for the given name/value pairs.
    pub fn new<N, V>(parameters: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            parameters: parameters
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Whether the injector carries any parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl EnvelopeHook for ParameterInjector {
    fn apply(&self, operation: &mut XmlElement) {
        if self.parameters.is_empty() {
            return;
        }

        if operation.child("Parameters").is_none() {
            debug!("adding Parameters container to the SOAP request");
        }
        let container = operation
            .child_mut_or_insert("Parameters")
            .child_mut_or_insert("Parameters");

        for (name, value) in &self.parameters {
            container.push_child(
                XmlElement::new("Parameter")
                    .with_attr("Name", name)
                    .with_attr("Value", value),
            );
        }
    }
}
