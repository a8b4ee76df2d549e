//! Response assembly.
//!
//! Converts collaborator results into HTTP responses:
//!
//! - **Receipt**: Atom entry built from a [`ResolvedReceipt`], with
//!   `Content-MD5` over the exact serialized bytes.
//! - **Statement / media**: the collaborator's bytes passed through with their
//!   own content type.
//! - **Errors**: SWORD error documents for protocol errors, bare status codes
//!   for authentication failures.
//!
//! HEAD responses are assembled exactly like GET and only drop the body.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::StatusCode;
use http::header::HeaderValue;
use swordstack_auth::challenge;
use swordstack_core::SwordConfig;
use swordstack_core::checksums::compute_md5;
use swordstack_core::dates::{format_atom_date, format_http_date};
use swordstack_model::uri::{
    CONTENT_TYPE_ENTRY, CONTENT_TYPE_ERROR, CONTENT_TYPE_FEED, REL_ALTERNATE,
    REL_DERIVED_RESOURCE, REL_EDIT, REL_EDIT_MEDIA, REL_ORIGINAL_DEPOSIT, REL_STATEMENT,
    REL_SWORD_EDIT, SWORD_PACKAGING, SWORD_TREATMENT, SWORD_VERBOSE_DESCRIPTION,
};
use swordstack_model::{
    AtomEntry, AuthFailure, EngineError, Extension, Generator, Link, MediaResource,
    ResolvedReceipt, ServerFault, Statement, SwordError,
};
use swordstack_xml::{ErrorDocument, entry_to_xml, error_document_to_xml};

use crate::body::SwordResponseBody;
use crate::request::{CONTENT_MD5, PACKAGING};

/// HTTP response type produced by the engine.
pub type SwordResponse = http::Response<SwordResponseBody>;

// ---------------------------------------------------------------------------
// Helper functions for building responses
// ---------------------------------------------------------------------------

/// Set an optional header on a response builder if the value is `Some`.
fn set_optional_header(
    builder: http::response::Builder,
    name: &str,
    value: Option<&str>,
) -> http::response::Builder {
    if let Some(v) = value {
        if let Ok(hv) = HeaderValue::from_str(v) {
            return builder.header(name, hv);
        }
    }
    builder
}

/// Set `Last-Modified` from the timestamp, or the current time.
fn set_last_modified(
    builder: http::response::Builder,
    value: Option<&DateTime<Utc>>,
) -> http::response::Builder {
    let formatted = format_http_date(value.unwrap_or(&Utc::now()));
    match HeaderValue::from_str(&formatted) {
        Ok(hv) => builder.header(http::header::LAST_MODIFIED, hv),
        Err(_) => builder,
    }
}

/// Set `Location`; a location that is not a valid header value is a server fault.
fn set_location(
    builder: http::response::Builder,
    location: Option<&str>,
) -> Result<http::response::Builder, ServerFault> {
    let Some(location) = location else {
        return Ok(builder);
    };
    let value = HeaderValue::from_str(location)
        .map_err(|e| ServerFault::with_source(format!("unencodable location {location:?}"), e))?;
    Ok(builder.header(http::header::LOCATION, value))
}

/// Build a response from a builder, converting build errors to a server fault.
fn build_response(
    builder: http::response::Builder,
    body: SwordResponseBody,
) -> Result<SwordResponse, ServerFault> {
    builder
        .body(body)
        .map_err(|e| ServerFault::with_source("failed to build HTTP response", e))
}

/// Attach `Content-Type` and `Content-MD5` for `bytes`, then the body unless `head`.
fn document_response(
    builder: http::response::Builder,
    content_type: &str,
    bytes: Bytes,
    head: bool,
) -> Result<SwordResponse, ServerFault> {
    let md5 = compute_md5(&bytes);
    let builder = set_optional_header(builder, http::header::CONTENT_TYPE.as_str(), Some(content_type));
    let builder = builder.header(CONTENT_MD5, md5);
    let body = if head {
        SwordResponseBody::empty()
    } else {
        SwordResponseBody::from_bytes(bytes)
    };
    build_response(builder, body)
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

/// Generator element advertised in receipts and error documents.
///
/// `None` when no generator URL is configured.
#[must_use]
pub fn generator(config: &SwordConfig) -> Option<Generator> {
    let uri = config.generator_url.as_deref().filter(|u| !u.is_empty())?;
    Some(Generator {
        uri: uri.to_owned(),
        version: Some(config.generator_version.clone()),
        value: config.administrator_email.clone(),
    })
}

/// Build the Atom entry for a receipt.
///
/// The collaborator's fragment comes first; the generated links and
/// extensions are appended in a fixed order.
#[must_use]
pub fn render_receipt(receipt: &ResolvedReceipt, generator: Option<Generator>) -> AtomEntry {
    let mut entry = receipt.entry.clone();
    if generator.is_some() {
        entry.generator = generator;
    }
    // Only from the receipt: the body must not vary between GET and HEAD.
    if entry.updated.is_none() {
        entry.updated = receipt.last_modified.as_ref().map(format_atom_date);
    }

    if let Some(edit) = &receipt.edit_iri {
        entry.id = Some(edit.clone());
        entry.add_link(Link::new(edit, REL_EDIT));
    }
    if let Some(sword_edit) = &receipt.sword_edit_iri {
        entry.add_link(Link::new(sword_edit, REL_SWORD_EDIT));
    }
    if let Some(feed) = &receipt.media_feed_iri {
        entry.add_link(Link::new(feed, REL_EDIT_MEDIA).with_media_type(CONTENT_TYPE_FEED));
    }
    if let Some(edit_media) = &receipt.edit_media_iri {
        entry.add_link(Link::new(edit_media, REL_EDIT_MEDIA));
    }
    for format in &receipt.packaging {
        entry.add_extension(Extension::sword(SWORD_PACKAGING, format));
    }
    for (iri, media_type) in &receipt.statements {
        entry.add_link(Link::new(iri, REL_STATEMENT).with_media_type(media_type));
    }
    entry.add_extension(Extension::sword(SWORD_TREATMENT, &receipt.treatment));
    if let Some(description) = &receipt.verbose_description {
        entry.add_extension(Extension::sword(SWORD_VERBOSE_DESCRIPTION, description));
    }
    if let Some(splash) = &receipt.splash_uri {
        entry.add_link(Link::new(splash, REL_ALTERNATE));
    }
    if let Some(original) = &receipt.original_deposit {
        let mut link = Link::new(&original.href, REL_ORIGINAL_DEPOSIT);
        link.media_type.clone_from(&original.media_type);
        entry.add_link(link);
    }
    for (iri, media_type) in &receipt.derived_resources {
        entry.add_link(Link::new(iri, REL_DERIVED_RESOURCE).with_media_type(media_type));
    }

    entry
}

fn serialize_receipt(receipt: &ResolvedReceipt, config: &SwordConfig) -> Result<Bytes, ServerFault> {
    let entry = render_receipt(receipt, generator(config));
    entry_to_xml(&entry)
        .map(Bytes::from)
        .map_err(|e| ServerFault::with_source("failed to serialize deposit receipt", e))
}

/// Receipt response for a retrieval (always carries the document headers).
pub fn receipt_response(
    receipt: &ResolvedReceipt,
    status: StatusCode,
    head: bool,
    config: &SwordConfig,
) -> Result<SwordResponse, ServerFault> {
    let bytes = serialize_receipt(receipt, config)?;

    let mut builder = http::Response::builder().status(status);
    builder = set_last_modified(builder, receipt.last_modified.as_ref());
    builder = set_location(builder, receipt.location.as_deref())?;
    document_response(builder, CONTENT_TYPE_ENTRY, bytes, head)
}

/// Response to a successful deposit.
///
/// With a receipt body: `201` when `created`, `200` otherwise. Without one
/// (`receipt.empty`, or receipts disabled): `201` when `created`, `204`
/// otherwise. A `require_location` deposit without a resolvable location is
/// a server fault.
pub fn deposit_response(
    receipt: &ResolvedReceipt,
    created: bool,
    require_location: bool,
    config: &SwordConfig,
) -> Result<SwordResponse, ServerFault> {
    if require_location && receipt.location.is_none() {
        return Err(ServerFault::new(
            "repository returned a deposit receipt without a location",
        ));
    }

    if config.return_deposit_receipt && !receipt.empty {
        let status = if created {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        return receipt_response(receipt, status, false, config);
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::NO_CONTENT
    };
    location_response(receipt, status)
}

/// Header-only response carrying `Location` and `Last-Modified`.
pub fn location_response(
    receipt: &ResolvedReceipt,
    status: StatusCode,
) -> Result<SwordResponse, ServerFault> {
    let mut builder = http::Response::builder().status(status);
    builder = set_location(builder, receipt.location.as_deref())?;
    builder = set_last_modified(builder, receipt.last_modified.as_ref());
    build_response(builder, SwordResponseBody::empty())
}

/// `204 No Content` with no headers.
pub fn no_content() -> Result<SwordResponse, ServerFault> {
    build_response(
        http::Response::builder().status(StatusCode::NO_CONTENT),
        SwordResponseBody::empty(),
    )
}

// ---------------------------------------------------------------------------
// Statements and media resources
// ---------------------------------------------------------------------------

/// Statement response in the statement's own content type.
pub fn statement_response(statement: Statement, head: bool) -> Result<SwordResponse, ServerFault> {
    let mut builder = http::Response::builder().status(StatusCode::OK);
    builder = set_last_modified(builder, statement.last_modified.as_ref());
    document_response(builder, &statement.content_type, statement.body, head)
}

/// Media resource content.
///
/// Defaults: `application/octet-stream`, `Packaging: SimpleZip` unless the
/// resource is unpackaged, `Content-MD5` computed when not supplied.
pub fn media_response(media: MediaResource, head: bool) -> Result<SwordResponse, ServerFault> {
    let mut builder = http::Response::builder().status(StatusCode::OK);
    builder = set_optional_header(
        builder,
        http::header::CONTENT_TYPE.as_str(),
        Some(media.effective_content_type()),
    );
    builder = set_optional_header(builder, PACKAGING, media.effective_packaging());
    builder = set_optional_header(builder, CONTENT_MD5, Some(media.effective_md5().as_str()));
    builder = set_last_modified(builder, media.last_modified.as_ref());

    let body = if head {
        SwordResponseBody::empty()
    } else {
        SwordResponseBody::from_bytes(media.payload)
    };
    build_response(builder, body)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Convert a protocol error into a SWORD error document response.
#[must_use]
pub fn error_to_response(err: &SwordError, config: &SwordConfig) -> SwordResponse {
    let generator = generator(config);
    let alternate = config.alternate_url.as_deref().map(|url| {
        let link = Link::new(url, REL_ALTERNATE);
        match config.alternate_url_content_type.as_deref() {
            Some(ct) => link.with_media_type(ct),
            None => link,
        }
    });

    let xml_bytes = error_document_to_xml(&ErrorDocument {
        error_uri: err.code.uri(),
        message: &err.message,
        verbose_description: err.verbose_description.as_deref(),
        updated: Utc::now(),
        generator: generator.as_ref(),
        alternate: alternate.as_ref(),
    });

    let body = SwordResponseBody::from_bytes(Bytes::from(xml_bytes));

    // Build the error response - this should not fail for valid status codes.
    http::Response::builder()
        .status(err.status_code)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE_ERROR)
        .body(body)
        .unwrap_or_else(|_| {
            http::Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(SwordResponseBody::empty())
                .expect("static response should be valid")
        })
}

/// Convert an authentication failure into a response.
///
/// | Failure | Response |
/// |---------|----------|
/// | `Retry` | 401 + `WWW-Authenticate` challenge |
/// | `Malformed` | 400, plain-text reason, no challenge |
/// | `Rejected` | 403, empty |
#[must_use]
pub fn auth_failure_to_response(failure: &AuthFailure, realm: &str) -> SwordResponse {
    let response = match failure {
        AuthFailure::Retry => set_optional_header(
            http::Response::builder().status(StatusCode::UNAUTHORIZED),
            http::header::WWW_AUTHENTICATE.as_str(),
            Some(challenge(realm).as_str()),
        )
        .body(SwordResponseBody::empty()),
        AuthFailure::Malformed(reason) => http::Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header(http::header::CONTENT_TYPE, "text/plain")
            .body(SwordResponseBody::from_string(reason.clone())),
        AuthFailure::Rejected(_) => http::Response::builder()
            .status(StatusCode::FORBIDDEN)
            .body(SwordResponseBody::empty()),
    };

    response.unwrap_or_else(|_| {
        http::Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(SwordResponseBody::empty())
            .expect("static response should be valid")
    })
}

/// Map any engine error to a response. Server faults are passed back to
/// the caller, which answers 500.
pub fn engine_error_to_response(
    err: EngineError,
    config: &SwordConfig,
) -> Result<SwordResponse, ServerFault> {
    match err {
        EngineError::Protocol(e) => {
            tracing::warn!(error_uri = e.code.uri(), status = %e.status_code, message = %e.message, "protocol error");
            Ok(error_to_response(&e, config))
        }
        EngineError::Auth(failure) => {
            tracing::warn!(failure = %failure, "authentication failure");
            Ok(auth_failure_to_response(&failure, &config.auth_realm))
        }
        EngineError::Server(fault) => Err(fault),
    }
}
