//! Incoming deposit.

use std::sync::Arc;

use bytes::Bytes;
use swordstack_core::{ArtifactGuard, SpoolError, TempArtifact, TempStorage};

use crate::entry::AtomEntry;

/// A client-submitted unit of content and/or metadata.
///
/// Owned by the request that created it. Temporary artifacts buffered for the
/// payload are released when the deposit is dropped.
#[derive(Debug)]
pub struct Deposit {
    /// Declared `Content-Type`.
    pub content_type: String,
    /// Declared packaging identifier.
    pub packaging: Option<String>,
    /// Declared (or measured) content length.
    pub content_length: u64,
    /// `Slug` hint.
    pub slug: Option<String>,
    /// Filename from `Content-Disposition`.
    pub filename: Option<String>,
    /// Client-supplied hex `Content-MD5`.
    pub md5: Option<String>,
    /// More deposits will follow.
    pub in_progress: bool,
    /// Binary payload carries metadata the server should extract.
    pub metadata_relevant: bool,
    /// Parsed Atom entry for metadata deposits.
    pub entry: Option<AtomEntry>,
    payload: Option<TempArtifact>,
    guard: ArtifactGuard,
}

impl Deposit {
    /// Create an empty deposit whose artifacts are released through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn TempStorage>) -> Self {
        Self {
            content_type: String::new(),
            packaging: None,
            content_length: 0,
            slug: None,
            filename: None,
            md5: None,
            in_progress: false,
            metadata_relevant: false,
            entry: None,
            payload: None,
            guard: ArtifactGuard::new(storage),
        }
    }

    /// Buffer `data` as this deposit's payload.
    pub async fn spool_payload(&mut self, data: Bytes) -> Result<&TempArtifact, SpoolError> {
        let artifact = self.guard.spool(data).await?;
        Ok(self.payload.insert(artifact))
    }

    /// Handle of the buffered payload.
    #[must_use]
    pub fn payload(&self) -> Option<&TempArtifact> {
        self.payload.as_ref()
    }

    /// Read the buffered payload back.
    pub async fn read_payload(&self) -> Result<Option<Bytes>, SpoolError> {
        match &self.payload {
            Some(artifact) => self.guard.storage().open(artifact).await.map(Some),
            None => Ok(None),
        }
    }

    /// Whether the deposit carries an Atom entry.
    #[must_use]
    pub fn is_entry(&self) -> bool {
        self.entry.is_some()
    }

    /// Whether the deposit carries a binary payload.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.payload.is_some()
    }

    /// Every temporary artifact recorded for this deposit.
    #[must_use]
    pub fn artifacts(&self) -> &[TempArtifact] {
        self.guard.artifacts()
    }
}
