//! Generated wrapper stylesheets.
//!
//! Build steps write small XSLT files into the tools directory that import
//! the stock stylesheets, set parameters, and include custom XSLT.

use std::path::{Path, PathBuf};

use pintail_xml::{escape_attr, ns};

use crate::paths::{path_string, write_file};
use crate::SiteError;

/// Builder for an `xsl:stylesheet` document.
#[derive(Debug, Clone, Default)]
pub struct WrapperStylesheet {
    namespaces: Vec<(String, String)>,
    extension_prefixes: Option<String>,
    body: Vec<String>,
}

impl WrapperStylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `xmlns:<prefix>`.
    #[must_use]
    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.namespaces.push((prefix.to_owned(), uri.to_owned()));
        self
    }

    #[must_use]
    pub fn extension_prefixes(mut self, prefixes: &str) -> Self {
        self.extension_prefixes = Some(prefixes.to_owned());
        self
    }

    #[must_use]
    pub fn import(self, href: impl AsRef<Path>) -> Self {
        let href = escape_attr(&path_string(href.as_ref()));
        self.raw(&format!("<xsl:import href=\"{href}\"/>"))
    }

    #[must_use]
    pub fn include(self, href: impl AsRef<Path>) -> Self {
        let href = escape_attr(&path_string(href.as_ref()));
        self.raw(&format!("<xsl:include href=\"{href}\"/>"))
    }

    /// Include every file in order.
    #[must_use]
    pub fn includes(self, hrefs: &[PathBuf]) -> Self {
        hrefs.iter().fold(self, Self::include)
    }

    /// Top-level parameter with a string default.
    #[must_use]
    pub fn param(self, name: &str, value: &str) -> Self {
        let select = escape_attr(&format!("'{value}'"));
        self.raw(&format!("<xsl:param name=\"{name}\" select=\"{select}\"/>"))
    }

    /// Top-level parameter defaulting to another parameter's value.
    #[must_use]
    pub fn param_from(self, name: &str, other: &str) -> Self {
        self.raw(&format!("<xsl:param name=\"{name}\" select=\"${other}\"/>"))
    }

    /// Append literal XSLT.
    #[must_use]
    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push(xml.to_owned());
        self
    }

    pub fn render(&self) -> String {
        let mut out = format!("<xsl:stylesheet xmlns:xsl=\"{}\"", ns::XSL);
        for (prefix, uri) in &self.namespaces {
            out.push_str(&format!(" xmlns:{prefix}=\"{}\"", escape_attr(uri)));
        }
        if let Some(prefixes) = &self.extension_prefixes {
            out.push_str(&format!(" extension-element-prefixes=\"{prefixes}\""));
        }
        out.push_str(" version=\"1.0\">\n");
        for line in &self.body {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("</xsl:stylesheet>\n");
        out
    }

    /// Write the stylesheet, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Io`] if the file can't be written.
    pub fn write(&self, path: &Path) -> Result<(), SiteError> {
        write_file(path, &self.render())
    }
}
