//! Media resource representation returned by managers.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use swordstack_core::checksums::compute_md5;

use crate::uri;

/// Binary content of a container, as served on the EM-IRI.
#[derive(Debug, Clone, Default)]
pub struct MediaResource {
    /// Content bytes.
    pub payload: Bytes,
    /// Media type; `application/octet-stream` when unset.
    pub content_type: Option<String>,
    /// Packaging identifier; SimpleZip when unset or empty.
    pub packaging: Option<String>,
    /// A single unpackaged file: no `Packaging` header is sent.
    pub unpackaged: bool,
    /// Hex MD5 of the payload; computed when unset.
    pub content_md5: Option<String>,
    /// Freshness timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

impl MediaResource {
    /// Create a resource with default metadata.
    #[must_use]
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            ..Self::default()
        }
    }

    /// Set the media type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the packaging identifier.
    #[must_use]
    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = Some(packaging.into());
        self
    }

    /// Mark as an unpackaged single file.
    #[must_use]
    pub fn with_unpackaged(mut self, unpackaged: bool) -> Self {
        self.unpackaged = unpackaged;
        self
    }

    /// Set a precomputed MD5.
    #[must_use]
    pub fn with_content_md5(mut self, md5: impl Into<String>) -> Self {
        self.content_md5 = Some(md5.into());
        self
    }

    /// Set the last-modified timestamp.
    #[must_use]
    pub fn with_last_modified(mut self, ts: DateTime<Utc>) -> Self {
        self.last_modified = Some(ts);
        self
    }

    /// Media type to advertise.
    #[must_use]
    pub fn effective_content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or(uri::CONTENT_TYPE_OCTET_STREAM)
    }

    /// Value of the `Packaging` header, if one is sent.
    #[must_use]
    pub fn effective_packaging(&self) -> Option<&str> {
        if self.unpackaged {
            return None;
        }
        match self.packaging.as_deref() {
            Some(p) if !p.trim().is_empty() => Some(p),
            _ => Some(uri::PACKAGE_SIMPLE_ZIP),
        }
    }

    /// Value of the `Content-MD5` header.
    #[must_use]
    pub fn effective_md5(&self) -> String {
        self.content_md5
            .clone()
            .unwrap_or_else(|| compute_md5(&self.payload))
    }
}
