//! SWORD error document formatting and XML error types.

use std::io;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, Event};
use swordstack_core::dates::format_atom_date;
use swordstack_model::uri::{
    ATOM_NAMESPACE, ERROR_TREATMENT, SWORD_PREFIX, SWORD_TERMS_NAMESPACE, SWORD_TREATMENT,
    SWORD_VERBOSE_DESCRIPTION,
};
use swordstack_model::{Generator, Link};

use crate::serialize::{write_generator, write_link, write_text_element};

/// Errors that can occur during XML serialization or parsing.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// Text or attribute content could not be decoded.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

/// Fields of a SWORD error document.
#[derive(Debug, Clone)]
pub struct ErrorDocument<'a> {
    /// Error URI (the `href` attribute of the root).
    pub error_uri: &'a str,
    /// Summary text.
    pub message: &'a str,
    /// Optional `sword:verboseDescription`.
    pub verbose_description: Option<&'a str>,
    /// Value of `atom:updated`.
    pub updated: DateTime<Utc>,
    /// Optional `atom:generator`.
    pub generator: Option<&'a Generator>,
    /// Optional `alternate` link to a human-readable explanation.
    pub alternate: Option<&'a Link>,
}

/// Format a SWORD error document.
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <sword:error xmlns="http://www.w3.org/2005/Atom"
///              xmlns:sword="http://purl.org/net/sword/terms/"
///              href="http://purl.org/net/sword/error/ErrorBadRequest">
///   <title>ERROR</title>
///   <updated>2024-01-01T00:00:00Z</updated>
///   <summary>In-Progress must be true or false</summary>
///   <sword:treatment>processing failed</sword:treatment>
/// </sword:error>
/// ```
#[must_use]
pub fn error_document_to_xml(doc: &ErrorDocument<'_>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(512);
    // Writing to Vec<u8> cannot fail short of a logic error.
    if let Err(e) = write_error_document(&mut buf, doc) {
        tracing::error!(error = %e, "failed to serialize SWORD error document");
        buf.clear();
    }
    buf
}

fn write_error_document(buf: &mut Vec<u8>, doc: &ErrorDocument<'_>) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = format!("{SWORD_PREFIX}:error");
    let treatment = format!("{SWORD_PREFIX}:{SWORD_TREATMENT}");
    let verbose = format!("{SWORD_PREFIX}:{SWORD_VERBOSE_DESCRIPTION}");

    writer
        .create_element(root.as_str())
        .with_attribute(("xmlns", ATOM_NAMESPACE))
        .with_attribute((format!("xmlns:{SWORD_PREFIX}").as_str(), SWORD_TERMS_NAMESPACE))
        .with_attribute(("href", doc.error_uri))
        .write_inner_content(|w| {
            write_text_element(w, "title", "ERROR")?;
            write_text_element(w, "updated", &format_atom_date(&doc.updated))?;
            if let Some(generator) = doc.generator {
                write_generator(w, generator)?;
            }
            write_text_element(w, "summary", doc.message)?;
            write_text_element(w, &treatment, ERROR_TREATMENT)?;
            if let Some(description) = doc.verbose_description {
                write_text_element(w, &verbose, description)?;
            }
            if let Some(link) = doc.alternate {
                write_link(w, link)?;
            }
            Ok(())
        })?;

    Ok(())
}
