//! Atom entry parsing.
//!
//! The document is first read into a small namespace-resolved element tree,
//! then mapped onto [`AtomEntry`]. Elements in the Atom namespace populate
//! the header fields and links; every other namespaced element becomes a
//! simple [`Extension`] carrying its trimmed text.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use swordstack_model::uri::ATOM_NAMESPACE;
use swordstack_model::{AtomEntry, Content, Extension, Generator, Link};

use crate::error::XmlError;

const XMLNS: &str = "xmlns";

#[derive(Debug, Default)]
struct Node {
    namespace: String,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn trimmed_text(&self) -> String {
        self.text.trim().to_owned()
    }

    fn is_atom(&self, name: &str) -> bool {
        self.namespace == ATOM_NAMESPACE && self.name == name
    }
}

/// Parse an Atom entry document.
///
/// # Errors
///
/// Returns `XmlError` if the document is not well-formed XML or its root is
/// not an Atom `entry`.
pub fn entry_from_xml(xml: &[u8]) -> Result<AtomEntry, XmlError> {
    let root = parse_tree(xml)?;
    if !root.is_atom("entry") {
        return Err(XmlError::UnexpectedElement(format!(
            "{{{}}}{}",
            root.namespace, root.name
        )));
    }

    let mut entry = AtomEntry::new();
    for child in root.children {
        if child.namespace != ATOM_NAMESPACE {
            if !child.namespace.is_empty() {
                let value = child.trimmed_text();
                entry.add_extension(Extension::new(child.namespace, child.name, value));
            }
            continue;
        }

        match child.name.as_str() {
            "id" => entry.id = Some(child.trimmed_text()),
            "title" => entry.title = Some(child.trimmed_text()),
            "updated" => entry.updated = Some(child.trimmed_text()),
            "summary" => entry.summary = Some(child.trimmed_text()),
            "author" => {
                if let Some(name) = child.children.iter().find(|c| c.is_atom("name")) {
                    entry.authors.push(name.trimmed_text());
                }
            }
            "content" => {
                let value = child.trimmed_text();
                entry.content = Some(Content {
                    src: child.attribute("src").map(str::to_owned),
                    media_type: child.attribute("type").map(str::to_owned),
                    value: (!value.is_empty()).then_some(value),
                });
            }
            "generator" => {
                let value = child.trimmed_text();
                entry.generator = Some(Generator {
                    uri: child.attribute("uri").unwrap_or_default().to_owned(),
                    version: child.attribute("version").map(str::to_owned),
                    value: (!value.is_empty()).then_some(value),
                });
            }
            "link" => {
                let Some(href) = child.attribute("href") else {
                    continue;
                };
                let rel = child.attribute("rel").unwrap_or("alternate");
                let mut link = Link::new(href, rel);
                link.media_type = child.attribute("type").map(str::to_owned);
                entry.add_link(link);
            }
            _ => {}
        }
    }

    Ok(entry)
}

/// Read the whole document into a namespace-resolved tree and return its root.
fn parse_tree(xml: &[u8]) -> Result<Node, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().check_end_names = true;

    let mut scopes: Vec<HashMap<String, String>> = Vec::new();
    let mut stack: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let (node, scope) = open_element(&e, &scopes)?;
                scopes.push(scope);
                stack.push(node);
            }
            Event::Empty(e) => {
                let (node, _) = open_element(&e, &scopes)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::End(_) => {
                scopes.pop();
                let node = stack
                    .pop()
                    .ok_or_else(|| XmlError::UnexpectedElement("unbalanced end tag".to_owned()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Text(e) => {
                if let Some(node) = stack.last_mut() {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    node.text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    node.text.push_str(&decoded);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(node) = stack.last_mut() {
                    let resolved = resolve_reference(&e)?;
                    node.text.push_str(&resolved);
                }
            }
            Event::Eof => {
                return Err(XmlError::MissingElement("root element".to_owned()));
            }
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }
}

fn resolve_reference(e: &quick_xml::events::BytesRef<'_>) -> Result<String, XmlError> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|err| XmlError::ParseError(err.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = e
        .decode()
        .map_err(|err| XmlError::ParseError(err.to_string()))?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(str::to_owned)
        .ok_or_else(|| XmlError::ParseError(format!("unknown entity: &{name};")))
}

/// Build a node for a start tag, resolving its namespace against the
/// declarations in scope plus any it declares itself.
fn open_element(
    e: &BytesStart<'_>,
    scopes: &[HashMap<String, String>],
) -> Result<(Node, HashMap<String, String>), XmlError> {
    let mut scope = HashMap::new();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| XmlError::ParseError(err.to_string()))?
            .to_owned();
        let raw = std::str::from_utf8(attr.value.as_ref())
            .map_err(|err| XmlError::ParseError(err.to_string()))?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|err| XmlError::ParseError(err.to_string()))?
            .into_owned();

        if key == XMLNS {
            scope.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.insert(prefix.to_owned(), value);
        } else {
            attributes.push((key, value));
        }
    }

    let qname = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| XmlError::ParseError(err.to_string()))?
        .to_owned();
    let (prefix, local) = match qname.split_once(':') {
        Some((prefix, local)) => (prefix.to_owned(), local.to_owned()),
        None => (String::new(), qname),
    };

    let namespace = scope
        .get(&prefix)
        .or_else(|| scopes.iter().rev().find_map(|s| s.get(&prefix)))
        .cloned();
    let namespace = match namespace {
        Some(ns) => ns,
        None if prefix.is_empty() => String::new(),
        None => {
            return Err(XmlError::ParseError(format!(
                "undeclared namespace prefix: {prefix}"
            )));
        }
    };

    let node = Node {
        namespace,
        name: local,
        attributes,
        ..Node::default()
    };
    Ok((node, scope))
}
