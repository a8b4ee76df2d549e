//! Atom/SWORD XML for SwordStack.
//!
//! # Key components
//!
//! - [`entry_to_xml`] for writing Atom entries (deposit receipts)
//! - [`entry_from_xml`] for parsing Atom entries submitted as metadata deposits
//! - [`error_document_to_xml`] for SWORD error documents
//!
//! # Conventions
//!
//! - Default namespace: `http://www.w3.org/2005/Atom`
//! - `sword:` prefix: `http://purl.org/net/sword/terms/`
//! - `dcterms:` prefix: `http://purl.org/dc/terms/`
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::entry_from_xml;
pub use error::{ErrorDocument, XmlError, error_document_to_xml};
pub use serialize::entry_to_xml;
