//! Element tree with text/tail content model.
//!
//! Mixed content is stored the way lxml does it: `text` holds the character
//! data before the first child, and each child's `tail` holds the character
//! data that follows its end tag.

use std::path::Path;

use crate::XmlError;

/// An XML element.
///
/// `name` is the qualified name as written (`mal:page`, `page`). `namespace`
/// is the URI the prefix resolved to when parsed, or the URI an element was
/// constructed for. Namespace declarations stay in `attrs` as ordinary
/// `xmlns` attributes so serialization reproduces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub namespace: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
    pub tail: String,
}

impl Element {
    /// Create an element without a namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an element in `namespace`.
    pub fn with_ns(namespace: &str, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.to_owned()),
            ..Self::default()
        }
    }

    /// Builder: add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: append a child.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Name without its prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit_once(':').map_or(&self.name, |(_, local)| local)
    }

    /// Whether this element has the given namespace and local name.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name() == local
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// The element's identifier: `xml:id`, falling back to `id`.
    pub fn id(&self) -> Option<&str> {
        self.attr("xml:id").or_else(|| self.attr("id"))
    }

    /// Namespace declarations carried on this element.
    pub fn namespace_decls(&self) -> impl Iterator<Item = &(String, String)> {
        self.attrs
            .iter()
            .filter(|(k, _)| k == "xmlns" || k.starts_with("xmlns:"))
    }

    /// Child elements with the given namespace and local name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(namespace, local))
    }

    /// First child element with the given namespace and local name.
    pub fn child(&self, namespace: &str, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, local))
    }

    /// This element and all descendant elements in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Concatenated character data of this element and its descendants.
    ///
    /// The element's own tail is not included.
    pub fn string_value(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    /// Find a descendant-or-self element by identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.descendants().find(|e| e.id() == Some(id))
    }
}

/// Pre-order iterator over an element and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// A processing instruction outside the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub target: String,
    pub content: String,
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
    /// Raw DOCTYPE declaration content, if any.
    pub doctype: Option<String>,
    /// Top-level processing instructions in document order.
    pub processing_instructions: Vec<ProcessingInstruction>,
}

impl Document {
    /// Wrap a root element in a document.
    pub fn new(root: Element) -> Self {
        Self {
            root,
            doctype: None,
            processing_instructions: Vec::new(),
        }
    }

    /// Parse a document from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not well-formed XML.
    pub fn parse(content: &str) -> Result<Self, XmlError> {
        crate::parser::parse_document(content)
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not well-formed.
    pub fn from_file(path: &Path) -> Result<Self, XmlError> {
        let content = std::fs::read_to_string(path).map_err(|source| XmlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Serialize and write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, path: &Path) -> Result<(), XmlError> {
        std::fs::write(path, self.to_xml_string()).map_err(|source| XmlError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Content of the first top-level processing instruction with `target`.
    pub fn processing_instruction(&self, target: &str) -> Option<&str> {
        self.processing_instructions
            .iter()
            .find(|pi| pi.target == target)
            .map(|pi| pi.content.as_str())
    }
}
