//! Error types for XML handling.

use std::path::PathBuf;

/// Error while reading or parsing an XML document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum XmlError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Document has no root element.
    #[error("document has no root element")]
    NoRoot,

    /// Document ended inside an element.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// Failed to read or write a document file.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
