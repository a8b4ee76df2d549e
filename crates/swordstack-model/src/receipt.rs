//! Deposit receipt model.
//!
//! Managers build a [`DepositReceipt`] describing where a deposit now lives
//! and what can be done with it. Every field is a plain optional value;
//! setters never touch other fields. Defaults are applied once, by
//! [`DepositReceipt::resolve`], right before the receipt is rendered.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::entry::{AtomEntry, Extension, Link};
use crate::uri;

/// Location of the originally deposited package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalDeposit {
    /// IRI of the package.
    pub href: String,
    /// Media type, when known.
    pub media_type: Option<String>,
}

/// Receipt fields as supplied by a manager.
#[derive(Debug, Clone, Default)]
pub struct DepositReceipt {
    /// Edit-IRI (container).
    pub edit_iri: Option<String>,
    /// SE-IRI (SWORD edit).
    pub sword_edit_iri: Option<String>,
    /// EM-IRI (media resource).
    pub edit_media_iri: Option<String>,
    /// Atom feed view of the media resource.
    pub media_feed_iri: Option<String>,
    /// `Location` response header.
    pub location: Option<String>,
    /// Accepted packaging formats, in order.
    pub packaging: Vec<String>,
    /// Statement IRI to media type.
    pub statements: BTreeMap<String, String>,
    /// Treatment description.
    pub treatment: Option<String>,
    /// Verbose description.
    pub verbose_description: Option<String>,
    /// Human-readable splash page.
    pub splash_uri: Option<String>,
    /// Original package.
    pub original_deposit: Option<OriginalDeposit>,
    /// Derived resource IRI to media type.
    pub derived_resources: BTreeMap<String, String>,
    /// Suppress the response body.
    pub empty: bool,
    /// Freshness timestamp.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entry that managers may extend directly; rendered first.
    pub entry: AtomEntry,
}

impl DepositReceipt {
    /// Create an empty receipt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Edit-IRI.
    #[must_use]
    pub fn with_edit_iri(mut self, iri: impl Into<String>) -> Self {
        self.edit_iri = Some(iri.into());
        self
    }

    /// Set the SE-IRI.
    #[must_use]
    pub fn with_sword_edit_iri(mut self, iri: impl Into<String>) -> Self {
        self.sword_edit_iri = Some(iri.into());
        self
    }

    /// Set the EM-IRI.
    #[must_use]
    pub fn with_edit_media_iri(mut self, iri: impl Into<String>) -> Self {
        self.edit_media_iri = Some(iri.into());
        self
    }

    /// Set the media feed IRI.
    #[must_use]
    pub fn with_media_feed_iri(mut self, iri: impl Into<String>) -> Self {
        self.media_feed_iri = Some(iri.into());
        self
    }

    /// Set the `Location` header value.
    #[must_use]
    pub fn with_location(mut self, iri: impl Into<String>) -> Self {
        self.location = Some(iri.into());
        self
    }

    /// Append a packaging format.
    #[must_use]
    pub fn with_packaging(mut self, format: impl Into<String>) -> Self {
        self.packaging.push(format.into());
        self
    }

    /// Add a statement link of the given media type.
    #[must_use]
    pub fn with_statement(mut self, iri: impl Into<String>, media_type: impl Into<String>) -> Self {
        self.statements.insert(iri.into(), media_type.into());
        self
    }

    /// Add an OAI-ORE statement link.
    #[must_use]
    pub fn with_ore_statement(self, iri: impl Into<String>) -> Self {
        self.with_statement(iri, uri::CONTENT_TYPE_ORE)
    }

    /// Add an Atom feed statement link.
    #[must_use]
    pub fn with_atom_statement(self, iri: impl Into<String>) -> Self {
        self.with_statement(iri, uri::CONTENT_TYPE_FEED)
    }

    /// Set the treatment description.
    #[must_use]
    pub fn with_treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment = Some(treatment.into());
        self
    }

    /// Set the verbose description.
    #[must_use]
    pub fn with_verbose_description(mut self, description: impl Into<String>) -> Self {
        self.verbose_description = Some(description.into());
        self
    }

    /// Set the splash page.
    #[must_use]
    pub fn with_splash_uri(mut self, iri: impl Into<String>) -> Self {
        self.splash_uri = Some(iri.into());
        self
    }

    /// Set the original deposit link.
    #[must_use]
    pub fn with_original_deposit(mut self, href: impl Into<String>, media_type: Option<String>) -> Self {
        self.original_deposit = Some(OriginalDeposit {
            href: href.into(),
            media_type,
        });
        self
    }

    /// Add a derived resource.
    #[must_use]
    pub fn with_derived_resource(mut self, iri: impl Into<String>, media_type: impl Into<String>) -> Self {
        self.derived_resources.insert(iri.into(), media_type.into());
        self
    }

    /// Mark the receipt as having no body.
    #[must_use]
    pub fn with_empty(mut self, empty: bool) -> Self {
        self.empty = empty;
        self
    }

    /// Set the last-modified timestamp.
    #[must_use]
    pub fn with_last_modified(mut self, ts: DateTime<Utc>) -> Self {
        self.last_modified = Some(ts);
        self
    }

    /// Add an `edit-media` link to the wrapped entry.
    pub fn add_edit_media_link(&mut self, href: impl Into<String>, media_type: Option<String>) {
        let mut link = Link::new(href, uri::REL_EDIT_MEDIA);
        link.media_type = media_type;
        self.entry.add_link(link);
    }

    /// Add a simple extension element to the wrapped entry.
    pub fn add_extension(&mut self, extension: Extension) {
        self.entry.add_extension(extension);
    }

    /// Add a Dublin Core term to the wrapped entry.
    pub fn add_dublin_core(&mut self, term: impl Into<String>, value: impl Into<String>) {
        self.entry.add_dublin_core(term, value);
    }

    /// Apply defaults.
    ///
    /// - An unset Edit-IRI takes the SE-IRI and vice versa. When both are set
    ///   they are kept as given.
    /// - An unset location takes the (resolved) Edit-IRI.
    /// - An unset treatment takes the standard "no treatment" text.
    #[must_use]
    pub fn resolve(self) -> ResolvedReceipt {
        let edit_iri = self.edit_iri.clone().or_else(|| self.sword_edit_iri.clone());
        let sword_edit_iri = self.sword_edit_iri.or_else(|| self.edit_iri.clone());
        let location = self.location.or_else(|| edit_iri.clone());

        ResolvedReceipt {
            edit_iri,
            sword_edit_iri,
            edit_media_iri: self.edit_media_iri,
            media_feed_iri: self.media_feed_iri,
            location,
            packaging: self.packaging,
            statements: self.statements,
            treatment: self
                .treatment
                .unwrap_or_else(|| uri::DEFAULT_TREATMENT.to_owned()),
            verbose_description: self.verbose_description,
            splash_uri: self.splash_uri,
            original_deposit: self.original_deposit,
            derived_resources: self.derived_resources,
            empty: self.empty,
            last_modified: self.last_modified,
            entry: self.entry,
        }
    }
}

/// A receipt with every default applied, ready to render.
#[derive(Debug, Clone)]
pub struct ResolvedReceipt {
    /// Edit-IRI.
    pub edit_iri: Option<String>,
    /// SE-IRI.
    pub sword_edit_iri: Option<String>,
    /// EM-IRI.
    pub edit_media_iri: Option<String>,
    /// Media feed IRI.
    pub media_feed_iri: Option<String>,
    /// `Location` header value.
    pub location: Option<String>,
    /// Packaging formats.
    pub packaging: Vec<String>,
    /// Statement IRI to media type.
    pub statements: BTreeMap<String, String>,
    /// Treatment description.
    pub treatment: String,
    /// Verbose description.
    pub verbose_description: Option<String>,
    /// Splash page.
    pub splash_uri: Option<String>,
    /// Original package.
    pub original_deposit: Option<OriginalDeposit>,
    /// Derived resources.
    pub derived_resources: BTreeMap<String, String>,
    /// Suppress the response body.
    pub empty: bool,
    /// Freshness timestamp.
    pub last_modified: Option<DateTime<Utc>>,
    /// Manager-supplied entry.
    pub entry: AtomEntry,
}
