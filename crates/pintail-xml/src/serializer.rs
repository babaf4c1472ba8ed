//! XML serialization for [`Element`] trees.

use crate::{Document, Element};

impl Element {
    /// Serialize this element, including its tail, to a string.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(1024);
        serialize_element(self, &mut out);
        out
    }
}

impl Document {
    /// Serialize the document with an XML declaration.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        if let Some(doctype) = &self.doctype {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push_str(">\n");
        }
        for pi in &self.processing_instructions {
            out.push_str("<?");
            out.push_str(&pi.target);
            if !pi.content.is_empty() {
                out.push(' ');
                out.push_str(&pi.content);
            }
            out.push_str("?>\n");
        }
        serialize_element(&self.root, &mut out);
        out.push('\n');
        out
    }
}

fn serialize_element(node: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&node.name);

    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_xml(value, true, out);
        out.push('"');
    }

    if node.children.is_empty() && node.text.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        escape_xml(&node.text, false, out);
        for child in &node.children {
            serialize_element(child, out);
        }
        out.push_str("</");
        out.push_str(&node.name);
        out.push('>');
    }

    escape_xml(&node.tail, false, out);
}

/// Escape text for use in an attribute value.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml(text, true, &mut out);
    out
}

/// Escape XML special characters.
fn escape_xml(text: &str, escape_quotes: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if escape_quotes => out.push_str("&quot;"),
            '\n' if escape_quotes => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcessingInstruction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"a&b "c" <d>"#), "a&amp;b &quot;c&quot; &lt;d&gt;");
    }

    #[test]
    fn test_serialize_nested() {
        let p = Element::new("p")
            .with_text("Say ")
            .with_child(Element {
                tail: " now".to_owned(),
                ..Element::new("em").with_text("hi")
            });
        assert_eq!(p.to_xml_string(), "<p>Say <em>hi</em> now</p>");
    }

    #[test]
    fn test_serialize_empty_and_attributes() {
        let el = Element::new("link")
            .with_attr("xref", "a\"b")
            .with_attr("site:dir", "/x/");
        assert_eq!(
            el.to_xml_string(),
            r#"<link xref="a&quot;b" site:dir="/x/"/>"#
        );
    }

    #[test]
    fn test_escape_text() {
        let el = Element::new("p").with_text("a < b & c > d");
        assert_eq!(el.to_xml_string(), "<p>a &lt; b &amp; c &gt; d</p>");
    }

    #[test]
    fn test_document_with_prolog() {
        let mut doc = Document::new(Element::new("book").with_attr("id", "index"));
        doc.processing_instructions.push(ProcessingInstruction {
            target: "db.chunk.max_depth".to_owned(),
            content: "2".to_owned(),
        });
        assert_eq!(
            doc.to_xml_string(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<?db.chunk.max_depth 2?>\n<book id=\"index\"/>\n"
        );
    }

    #[test]
    fn test_reparse_preserves_tree() {
        let source = r#"<page xmlns="http://projectmallard.org/1.0/" id="a"><info><link type="guide" xref="b"/></info><title>A &amp; B</title></page>"#;
        let doc = Document::parse(source).unwrap();
        let again = Document::parse(&doc.to_xml_string()).unwrap();
        assert_eq!(doc.root, again.root);
    }
}
