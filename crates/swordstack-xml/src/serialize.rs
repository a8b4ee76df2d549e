//! Atom entry serialization.
//!
//! Entries are written with the Atom namespace as the default namespace and
//! the SWORD and Dublin Core namespaces bound to their conventional prefixes
//! on the root element. Extension elements in any other namespace redeclare
//! the default namespace locally.
//!
//! Child order is fixed: `id`, `title`, `updated`, `author`, `summary`,
//! `content`, `generator`, then links and extensions in the order they were
//! added.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use swordstack_model::uri::{
    ATOM_NAMESPACE, DC_NAMESPACE, DC_PREFIX, SWORD_PREFIX, SWORD_TERMS_NAMESPACE,
};
use swordstack_model::{AtomEntry, EntryElement, Extension, Generator, Link};

use crate::error::XmlError;

/// Serialize an entry as a complete XML document.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn entry_to_xml(entry: &AtomEntry) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(1024);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element("entry")
        .with_attribute(("xmlns", ATOM_NAMESPACE))
        .with_attribute((format!("xmlns:{SWORD_PREFIX}").as_str(), SWORD_TERMS_NAMESPACE))
        .with_attribute((format!("xmlns:{DC_PREFIX}").as_str(), DC_NAMESPACE))
        .write_inner_content(|w| write_entry_content(w, entry))?;

    Ok(buf)
}

fn write_entry_content<W: Write>(writer: &mut Writer<W>, entry: &AtomEntry) -> io::Result<()> {
    write_optional_text(writer, "id", entry.id.as_deref())?;
    write_optional_text(writer, "title", entry.title.as_deref())?;
    write_optional_text(writer, "updated", entry.updated.as_deref())?;
    for author in &entry.authors {
        writer
            .create_element("author")
            .write_inner_content(|w| write_text_element(w, "name", author))?;
    }
    write_optional_text(writer, "summary", entry.summary.as_deref())?;

    if let Some(content) = &entry.content {
        let mut element = writer.create_element("content");
        if let Some(media_type) = &content.media_type {
            element = element.with_attribute(("type", media_type.as_str()));
        }
        if let Some(src) = &content.src {
            element = element.with_attribute(("src", src.as_str()));
        }
        match &content.value {
            Some(value) => {
                element.write_text_content(BytesText::new(value))?;
            }
            None => {
                element.write_empty()?;
            }
        }
    }

    if let Some(generator) = &entry.generator {
        write_generator(writer, generator)?;
    }

    for element in &entry.elements {
        match element {
            EntryElement::Link(link) => write_link(writer, link)?,
            EntryElement::Extension(ext) => write_extension(writer, ext)?,
        }
    }
    Ok(())
}

/// Write an `atom:generator` element.
pub(crate) fn write_generator<W: Write>(
    writer: &mut Writer<W>,
    generator: &Generator,
) -> io::Result<()> {
    let mut element = writer
        .create_element("generator")
        .with_attribute(("uri", generator.uri.as_str()));
    if let Some(version) = &generator.version {
        element = element.with_attribute(("version", version.as_str()));
    }
    match &generator.value {
        Some(value) => {
            element.write_text_content(BytesText::new(value))?;
        }
        None => {
            element.write_empty()?;
        }
    }
    Ok(())
}

/// Write an `atom:link` element.
pub(crate) fn write_link<W: Write>(writer: &mut Writer<W>, link: &Link) -> io::Result<()> {
    let mut element = writer
        .create_element("link")
        .with_attribute(("rel", link.rel.as_str()));
    if let Some(media_type) = &link.media_type {
        element = element.with_attribute(("type", media_type.as_str()));
    }
    element
        .with_attribute(("href", link.href.as_str()))
        .write_empty()?;
    Ok(())
}

/// Write a simple extension element, choosing a prefix for known namespaces.
pub(crate) fn write_extension<W: Write>(
    writer: &mut Writer<W>,
    ext: &Extension,
) -> io::Result<()> {
    let qualified = match ext.namespace.as_str() {
        SWORD_TERMS_NAMESPACE => format!("{SWORD_PREFIX}:{}", ext.name),
        DC_NAMESPACE => format!("{DC_PREFIX}:{}", ext.name),
        ATOM_NAMESPACE => ext.name.clone(),
        _ => {
            writer
                .create_element(ext.name.as_str())
                .with_attribute(("xmlns", ext.namespace.as_str()))
                .write_text_content(BytesText::new(&ext.value))?;
            return Ok(());
        }
    };
    write_text_element(writer, &qualified, &ext.value)
}

/// Write a simple `<tag>text</tag>` element.
pub(crate) fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only if the value is `Some`.
fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}
