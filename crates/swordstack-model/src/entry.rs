//! Atom entry fragment.
//!
//! A small, serialization-independent model of an Atom entry: the standard
//! header fields plus an ordered list of links and simple extension elements.
//! Deposit receipts wrap one of these so repository managers can add their
//! own elements before the engine appends the generated ones.

use std::collections::BTreeMap;

use crate::uri;

/// An Atom `link` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target IRI.
    pub href: String,
    /// Link relation.
    pub rel: String,
    /// Advertised media type (`type` attribute).
    pub media_type: Option<String>,
}

impl Link {
    /// Create a link without a media type.
    #[must_use]
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            media_type: None,
        }
    }

    /// Set the `type` attribute.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// A simple (text-only) foreign-namespace element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Namespace URI.
    pub namespace: String,
    /// Local name.
    pub name: String,
    /// Text content.
    pub value: String,
}

impl Extension {
    /// Create an extension element.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an element in the SWORD terms namespace.
    #[must_use]
    pub fn sword(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(uri::SWORD_TERMS_NAMESPACE, name, value)
    }

    /// Create an element in the Dublin Core terms namespace.
    #[must_use]
    pub fn dublin_core(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(uri::DC_NAMESPACE, name, value)
    }
}

/// One ordered child of an entry after its header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryElement {
    /// `atom:link`.
    Link(Link),
    /// Foreign-namespace element.
    Extension(Extension),
}

/// The Atom `generator` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    /// `uri` attribute.
    pub uri: String,
    /// `version` attribute.
    pub version: Option<String>,
    /// Text content (administrator contact).
    pub value: Option<String>,
}

/// The Atom `content` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    /// Out-of-line content location (`src` attribute).
    pub src: Option<String>,
    /// `type` attribute.
    pub media_type: Option<String>,
    /// Inline text.
    pub value: Option<String>,
}

/// An Atom entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomEntry {
    /// `atom:id`.
    pub id: Option<String>,
    /// `atom:title`.
    pub title: Option<String>,
    /// `atom:updated`, kept as written.
    pub updated: Option<String>,
    /// `atom:author/atom:name` values.
    pub authors: Vec<String>,
    /// `atom:summary`.
    pub summary: Option<String>,
    /// `atom:content`.
    pub content: Option<Content>,
    /// `atom:generator`.
    pub generator: Option<Generator>,
    /// Links and extension elements, in document order.
    pub elements: Vec<EntryElement>,
}

impl AtomEntry {
    /// Create an empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link.
    pub fn add_link(&mut self, link: Link) {
        self.elements.push(EntryElement::Link(link));
    }

    /// Append an extension element.
    pub fn add_extension(&mut self, extension: Extension) {
        self.elements.push(EntryElement::Extension(extension));
    }

    /// Append a Dublin Core term.
    pub fn add_dublin_core(&mut self, term: impl Into<String>, value: impl Into<String>) {
        self.add_extension(Extension::dublin_core(term, value));
    }

    /// Set out-of-line content.
    pub fn set_content(&mut self, src: impl Into<String>, media_type: impl Into<String>) {
        self.content = Some(Content {
            src: Some(src.into()),
            media_type: Some(media_type.into()),
            value: None,
        });
    }

    /// All links, in document order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.elements.iter().filter_map(|e| match e {
            EntryElement::Link(link) => Some(link),
            EntryElement::Extension(_) => None,
        })
    }

    /// Links with relation `rel`.
    pub fn links_with_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links().filter(move |l| l.rel == rel)
    }

    /// All extension elements, in document order.
    pub fn extensions(&self) -> impl Iterator<Item = &Extension> {
        self.elements.iter().filter_map(|e| match e {
            EntryElement::Extension(ext) => Some(ext),
            EntryElement::Link(_) => None,
        })
    }

    /// Text of the first extension element named `name` in `namespace`.
    #[must_use]
    pub fn extension_value(&self, namespace: &str, name: &str) -> Option<&str> {
        self.extensions()
            .find(|e| e.namespace == namespace && e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Dublin Core terms, grouped by term name in document order.
    #[must_use]
    pub fn dublin_core(&self) -> BTreeMap<String, Vec<String>> {
        let mut terms: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for ext in self.extensions().filter(|e| e.namespace == uri::DC_NAMESPACE) {
            terms
                .entry(ext.name.clone())
                .or_default()
                .push(ext.value.clone());
        }
        terms
    }
}
