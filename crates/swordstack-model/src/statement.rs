//! Statement (status document) of a container.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::uri;

/// A pre-rendered status document.
#[derive(Debug, Clone)]
pub struct Statement {
    /// Serialized document.
    pub body: Bytes,
    /// Media type of [`Self::body`].
    pub content_type: String,
    /// Freshness timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

impl Statement {
    /// Create a statement of any media type.
    #[must_use]
    pub fn new(body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
            last_modified: None,
        }
    }

    /// OAI-ORE resource map statement.
    #[must_use]
    pub fn ore(body: impl Into<Bytes>) -> Self {
        Self::new(body, uri::CONTENT_TYPE_ORE)
    }

    /// Atom feed statement.
    #[must_use]
    pub fn atom(body: impl Into<Bytes>) -> Self {
        Self::new(body, uri::CONTENT_TYPE_FEED)
    }

    /// Set the last-modified timestamp.
    #[must_use]
    pub fn with_last_modified(mut self, ts: DateTime<Utc>) -> Self {
        self.last_modified = Some(ts);
        self
    }
}
