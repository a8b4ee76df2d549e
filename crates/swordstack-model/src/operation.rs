//! Classified operations.
//!
//! The request classifier turns method, headers, and body into exactly one of
//! these variants. Endpoints match on the variant and never re-inspect the
//! request.

use std::fmt;

use crate::accept::AcceptHeaders;
use crate::deposit::Deposit;

/// A GET or HEAD.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// Collected `Accept*` headers.
    pub accept: AcceptHeaders,
    /// Suppress the response body.
    pub head: bool,
}

/// Operation on a container (Edit-IRI).
#[derive(Debug)]
pub enum ContainerOperation {
    /// GET/HEAD.
    Retrieve(Retrieval),
    /// PUT of an Atom entry.
    ReplaceMetadata(Deposit),
    /// POST of an Atom entry.
    AddMetadata(Deposit),
    /// POST with an empty body.
    UseHeaders(Deposit),
    /// POST of a binary payload.
    AddResources(Deposit),
    /// DELETE.
    Delete,
}

impl ContainerOperation {
    /// Operation name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Retrieve(r) if r.head => "HeadContainer",
            Self::Retrieve(_) => "GetContainer",
            Self::ReplaceMetadata(_) => "ReplaceMetadata",
            Self::AddMetadata(_) => "AddMetadata",
            Self::UseHeaders(_) => "UseHeaders",
            Self::AddResources(_) => "AddResources",
            Self::Delete => "DeleteContainer",
        }
    }
}

impl fmt::Display for ContainerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operation on a media resource (EM-IRI).
#[derive(Debug)]
pub enum MediaResourceOperation {
    /// GET/HEAD.
    Retrieve(Retrieval),
    /// PUT of a binary payload.
    ReplaceResource(Deposit),
    /// POST of a binary payload.
    AddResource(Deposit),
    /// DELETE.
    Delete,
}

impl MediaResourceOperation {
    /// Operation name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Retrieve(r) if r.head => "HeadMediaResource",
            Self::Retrieve(_) => "GetMediaResource",
            Self::ReplaceResource(_) => "ReplaceMediaResource",
            Self::AddResource(_) => "AddResource",
            Self::Delete => "DeleteMediaResource",
        }
    }
}

impl fmt::Display for MediaResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Representation chosen for a container retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Deposit receipt (Atom entry).
    Receipt,
    /// Statement document.
    Statement,
}
