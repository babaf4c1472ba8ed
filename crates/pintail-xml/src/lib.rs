//! XML document tree for Pintail.
//!
//! A small owned element tree over [`quick_xml`] events. Format plugins use
//! it to read staged documents, extract metadata for the cache document and
//! search index, and rewrite staged files.
//!
//! # Example
//!
//! ```
//! use pintail_xml::{Document, ns};
//!
//! let doc = Document::parse(
//!     r#"<page xmlns="http://projectmallard.org/1.0/" id="index"><title>Home</title></page>"#,
//! )
//! .unwrap();
//! let title = doc.root.child(ns::MALLARD, "title").unwrap();
//! assert_eq!(title.string_value(), "Home");
//! ```

mod error;
mod parser;
mod serializer;
mod tree;

pub use error::XmlError;
pub use serializer::escape_attr;
pub use tree::{Descendants, Document, Element, ProcessingInstruction};

/// Namespace URIs used across Pintail documents.
pub mod ns {
    /// Mallard pages.
    pub const MALLARD: &str = "http://projectmallard.org/1.0/";
    /// Mallard cache documents.
    pub const CACHE: &str = "http://projectmallard.org/cache/1.0/";
    /// Site extension attributes (`site:dir`).
    pub const SITE: &str = "http://projectmallard.org/site/1.0/";
    /// Pintail extension elements (`pintail:external`).
    pub const PINTAIL: &str = "http://pintail.io/";
    /// DocBook 5.
    pub const DOCBOOK: &str = "http://docbook.org/ns/docbook";
    /// `XLink`.
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    /// The reserved `xml` prefix.
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// Atom syndication feeds.
    pub const ATOM: &str = "http://www.w3.org/2005/Atom";
    /// XSLT stylesheets.
    pub const XSL: &str = "http://www.w3.org/1999/XSL/Transform";
    /// `XInclude` directives.
    pub const XINCLUDE: &str = "http://www.w3.org/2001/XInclude";
    /// EXSLT common extensions (`exsl:document`).
    pub const EXSL: &str = "http://exslt.org/common";
    /// XHTML output.
    pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
}
