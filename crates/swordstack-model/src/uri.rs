//! Namespaces, link relations, packaging identifiers, and error URIs used on
//! the wire.

/// Atom syndication namespace.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
/// SWORD terms namespace (extension elements and relations).
pub const SWORD_TERMS_NAMESPACE: &str = "http://purl.org/net/sword/terms/";
/// Dublin Core terms namespace.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/terms/";

/// Conventional prefix for [`SWORD_TERMS_NAMESPACE`].
pub const SWORD_PREFIX: &str = "sword";
/// Conventional prefix for [`DC_NAMESPACE`].
pub const DC_PREFIX: &str = "dcterms";

/// `sword:packaging` extension element name.
pub const SWORD_PACKAGING: &str = "packaging";
/// `sword:treatment` extension element name.
pub const SWORD_TREATMENT: &str = "treatment";
/// `sword:verboseDescription` extension element name.
pub const SWORD_VERBOSE_DESCRIPTION: &str = "verboseDescription";

/// Atom `edit` relation.
pub const REL_EDIT: &str = "edit";
/// Atom `edit-media` relation.
pub const REL_EDIT_MEDIA: &str = "edit-media";
/// Atom `alternate` relation.
pub const REL_ALTERNATE: &str = "alternate";
/// SWORD edit (SE-IRI) relation.
pub const REL_SWORD_EDIT: &str = "http://purl.org/net/sword/terms/add";
/// Statement relation.
pub const REL_STATEMENT: &str = "http://purl.org/net/sword/terms/statement";
/// Original deposit relation.
pub const REL_ORIGINAL_DEPOSIT: &str = "http://purl.org/net/sword/terms/originalDeposit";
/// Derived resource relation.
pub const REL_DERIVED_RESOURCE: &str = "http://purl.org/net/sword/terms/derivedResource";

/// Zip archive with no further structure.
pub const PACKAGE_SIMPLE_ZIP: &str = "http://purl.org/net/sword/package/SimpleZip";
/// Opaque binary content.
pub const PACKAGE_BINARY: &str = "http://purl.org/net/sword/package/Binary";

/// Atom entry media type.
pub const CONTENT_TYPE_ENTRY: &str = "application/atom+xml;type=entry";
/// Atom feed media type.
pub const CONTENT_TYPE_FEED: &str = "application/atom+xml;type=feed";
/// OAI-ORE resource map media type.
pub const CONTENT_TYPE_ORE: &str = "application/rdf+xml";
/// SWORD error document media type.
pub const CONTENT_TYPE_ERROR: &str = "application/xml";
/// Fallback media type for binary payloads.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Treatment text used when the manager supplies none.
pub const DEFAULT_TREATMENT: &str = "no treatment information available";
/// Treatment text written into error documents.
pub const ERROR_TREATMENT: &str = "processing failed";

/// Base of every SWORD error URI.
pub const ERROR_BASE: &str = "http://purl.org/net/sword/error/";
/// Unsupported or unacceptable content.
pub const ERROR_CONTENT: &str = "http://purl.org/net/sword/error/ErrorContent";
/// Supplied checksum does not match the payload.
pub const ERROR_CHECKSUM_MISMATCH: &str = "http://purl.org/net/sword/error/ErrorChecksumMismatch";
/// Malformed request.
pub const ERROR_BAD_REQUEST: &str = "http://purl.org/net/sword/error/ErrorBadRequest";
/// `On-Behalf-Of` user is unknown.
pub const ERROR_TARGET_OWNER_UNKNOWN: &str = "http://purl.org/net/sword/error/TargetOwnerUnknown";
/// Mediated deposit is disabled.
pub const ERROR_MEDIATION_NOT_ALLOWED: &str =
    "http://purl.org/net/sword/error/MediationNotAllowed";
/// Method not supported on this resource.
pub const ERROR_METHOD_NOT_ALLOWED: &str = "http://purl.org/net/sword/error/MethodNotAllowed";
/// Payload exceeds the configured upload limit.
pub const ERROR_MAX_UPLOAD_SIZE_EXCEEDED: &str =
    "http://purl.org/net/sword/error/MaxUploadSizeExceeded";
