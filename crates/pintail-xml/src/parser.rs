//! Event-driven parser building an [`Element`] tree.
//!
//! Comments and processing instructions inside the root element are
//! dropped. Prefixes are resolved against the `xmlns` declarations in
//! scope so that each element records its namespace URI.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::{Document, Element, ProcessingInstruction, XmlError, ns};

/// Namespace bindings declared on one element.
type Scope = Vec<(String, String)>;

pub(crate) fn parse_document(content: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut root: Option<Element> = None;
    let mut doctype = None;
    let mut pis = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let element = open_element(&reader, &e, &mut scopes)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = open_element(&reader, &e, &mut scopes)?;
                scopes.pop();
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                scopes.pop();
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut root);
                }
            }
            Event::Text(e) => {
                if !stack.is_empty() {
                    let text = reader.decoder().decode(&e)?;
                    append_text(&mut stack, &text);
                }
            }
            Event::GeneralRef(e) => {
                if !stack.is_empty() {
                    let entity = reader.decoder().decode(&e)?;
                    append_text(&mut stack, &decode_entity(&entity));
                }
            }
            Event::CData(e) => {
                if !stack.is_empty() {
                    append_text(&mut stack, &String::from_utf8_lossy(&e));
                }
            }
            Event::PI(e) => {
                if stack.is_empty() {
                    let raw = reader.decoder().decode(&e)?;
                    let (target, content) = raw
                        .trim()
                        .split_once(char::is_whitespace)
                        .unwrap_or((raw.trim(), ""));
                    pis.push(ProcessingInstruction {
                        target: target.to_owned(),
                        content: content.trim().to_owned(),
                    });
                }
            }
            Event::DocType(e) => {
                doctype = Some(reader.decoder().decode(&e)?.trim().to_owned());
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    let root = root.ok_or(XmlError::NoRoot)?;
    Ok(Document {
        root,
        doctype,
        processing_instructions: pis,
    })
}

fn open_element(
    reader: &Reader<&[u8]>,
    e: &BytesStart,
    scopes: &mut Vec<Scope>,
) -> Result<Element, XmlError> {
    let name = decode_name(reader, e.name().as_ref());
    let mut attrs = Vec::new();
    let mut scope = Scope::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = decode_name(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        if key == "xmlns" {
            scope.push((String::new(), value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((prefix.to_owned(), value.clone()));
        }
        attrs.push((key, value));
    }
    scopes.push(scope);

    let prefix = name.rsplit_once(':').map_or("", |(p, _)| p);
    let namespace = resolve(scopes, prefix);
    Ok(Element {
        name,
        namespace,
        attrs,
        ..Element::default()
    })
}

/// Resolve a prefix against the innermost binding in scope.
fn resolve(scopes: &[Scope], prefix: &str) -> Option<String> {
    if prefix == "xml" {
        return Some(ns::XML.to_owned());
    }
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter())
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        Cow::into_owned,
    )
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Append text to the open element's text or its last child's tail.
fn append_text(stack: &mut [Element], text: &str) {
    let Some(node) = stack.last_mut() else {
        return;
    };
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity, preserve as-is
        _ => format!("&{entity};"),
    }
}
