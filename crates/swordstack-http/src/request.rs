//! Request helpers.
//!
//! Small, pure functions over [`http::HeaderMap`] and [`http::request::Parts`]
//! used by the classifier and the endpoints, plus [`read_body`], which
//! collects the request body under the configured upload limit.

use bytes::Bytes;
use http::HeaderMap;
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use percent_encoding::percent_decode_str;
use swordstack_model::uri::CONTENT_TYPE_OCTET_STREAM;
use swordstack_model::{EngineError, ServerFault, SwordError};
use tracing::debug;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `In-Progress` request header.
pub const IN_PROGRESS: &str = "in-progress";
/// `Metadata-Relevant` request header.
pub const METADATA_RELEVANT: &str = "metadata-relevant";
/// `Packaging` request and response header.
pub const PACKAGING: &str = "packaging";
/// `Slug` request header.
pub const SLUG: &str = "slug";
/// `Content-MD5` request and response header.
pub const CONTENT_MD5: &str = "content-md5";
/// `Content-Disposition` request header.
pub const CONTENT_DISPOSITION: &str = "content-disposition";

/// Extract a header value as a trimmed string slice.
#[must_use]
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// Extract a non-empty header value as an owned string.
#[must_use]
pub fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    header_str(headers, name)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Read a boolean protocol header.
///
/// Absent or empty means `false`; otherwise the value must be `true` or
/// `false` (case-insensitive).
pub fn header_flag(headers: &HeaderMap, name: &str) -> Result<bool, SwordError> {
    match header_str(headers, name) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(SwordError::bad_request(format!(
            "The {name} header must be 'true' or 'false', got '{v}'"
        ))),
    }
}

/// The declared `Content-Type`, or `application/octet-stream` when absent.
#[must_use]
pub fn content_type(headers: &HeaderMap) -> String {
    header_str(headers, http::header::CONTENT_TYPE.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or(CONTENT_TYPE_OCTET_STREAM)
        .to_owned()
}

/// The declared `Content-Length`, or the received body length when absent
/// or unparseable.
#[must_use]
pub fn content_length(headers: &HeaderMap, body_len: usize) -> u64 {
    header_str(headers, http::header::CONTENT_LENGTH.as_str())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(body_len as u64)
}

/// Collect the request body, enforcing `max_upload_size`.
///
/// A declared `Content-Length` over the limit is refused before any byte is
/// read, and a body that streams past the limit is cut off. Either way the
/// error is `MaxUploadSizeExceeded`. Transport failures are server faults.
pub async fn read_body<B>(
    body: B,
    headers: &HeaderMap,
    max_upload_size: Option<u64>,
) -> Result<Bytes, EngineError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let Some(limit) = max_upload_size else {
        return body
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|err| body_fault(err.into()));
    };

    let declared = header_str(headers, http::header::CONTENT_LENGTH.as_str())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(declared) = declared.filter(|len| *len > limit) {
        debug!(declared, limit, "declared length over the upload limit");
        return Err(SwordError::max_upload_size_exceeded(limit).into());
    }

    let cap = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(body, cap).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => {
            debug!(limit, "body streamed past the upload limit");
            Err(SwordError::max_upload_size_exceeded(limit).into())
        }
        Err(err) => Err(body_fault(err)),
    }
}

fn body_fault(source: BoxError) -> EngineError {
    ServerFault {
        message: "failed to read request body".to_owned(),
        source: Some(source),
    }
    .into()
}

/// Whether the content type is any `multipart/*` type.
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::MULTIPART)
        .unwrap_or_else(|_| {
            content_type
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/")
        })
}

/// Whether the content type is an Atom entry.
///
/// Accepts `application/atom+xml` with `type=entry` or with no `type`
/// parameter.
#[must_use]
pub fn is_atom_entry(content_type: &str) -> bool {
    let Ok(parsed) = content_type.parse::<mime::Mime>() else {
        return false;
    };
    if parsed.type_() != mime::APPLICATION || parsed.subtype().as_str() != "atom" {
        return false;
    }
    if parsed.suffix() != Some(mime::XML) {
        return false;
    }
    parsed
        .get_param("type")
        .is_none_or(|t| t.as_str().eq_ignore_ascii_case("entry"))
}

/// Filename from a `Content-Disposition` value.
///
/// Prefers the RFC 5987 `filename*` form over plain `filename`.
#[must_use]
pub fn content_disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    for part in value.split(';').skip(1) {
        let Some((key, raw)) = part.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let raw = raw.trim().trim_matches('"');
        match key.as_str() {
            "filename*" => {
                // charset'language'percent-encoded
                let encoded = raw.splitn(3, '\'').nth(2).unwrap_or(raw);
                if let Ok(decoded) = percent_decode_str(encoded).decode_utf8() {
                    return Some(decoded.into_owned());
                }
            }
            "filename" if !raw.is_empty() => plain = Some(raw.to_owned()),
            _ => {}
        }
    }
    plain
}

/// The full IRI of the request, as handed to repository managers.
///
/// Uses the absolute request URI when present, otherwise rebuilds it from
/// the `Host` header over `http`.
#[must_use]
pub fn full_iri(parts: &http::request::Parts) -> String {
    let path = parts
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    if let Some(authority) = parts.uri.authority() {
        let scheme = parts.uri.scheme_str().unwrap_or("http");
        return format!("{scheme}://{authority}{path}");
    }

    let host = header_str(&parts.headers, http::header::HOST.as_str())
        .filter(|h| !h.is_empty())
        .unwrap_or("localhost");
    format!("http://{host}{path}")
}
