//! Request classification.
//!
//! Turns method, headers, and body into exactly one [`ContainerOperation`] or
//! [`MediaResourceOperation`]. Binary payloads are spooled through the
//! [`TempStorage`] provider and recorded on the [`Deposit`] before any
//! validation runs, so a failed checksum or size check still releases them
//! when the deposit is dropped.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use http::request::Parts;
use swordstack_core::checksums::compute_md5;
use swordstack_core::{SwordConfig, TempStorage};
use swordstack_model::uri::PACKAGE_BINARY;
use swordstack_model::{
    AcceptHeaders, ContainerOperation, Deposit, EngineError, MediaResourceOperation, Retrieval,
    SwordError,
};
use tracing::debug;

use crate::request::{
    CONTENT_DISPOSITION, CONTENT_MD5, IN_PROGRESS, METADATA_RELEVANT, PACKAGING, SLUG,
    content_disposition_filename, content_length, content_type, header_flag, header_str,
    header_string, is_atom_entry, is_multipart,
};

const MULTIPART_NOT_SUPPORTED: &str = "Multipart deposits are not supported";

/// Which optional flags a binary deposit reads.
#[derive(Debug, Clone, Copy)]
struct BinaryFlags {
    in_progress: bool,
    metadata_relevant: bool,
}

/// Classify a request against a container (Edit-IRI).
pub async fn classify_container(
    parts: &Parts,
    body: Bytes,
    storage: &Arc<dyn TempStorage>,
    config: &SwordConfig,
) -> Result<ContainerOperation, EngineError> {
    let content_type = content_type(&parts.headers);

    let op = match parts.method {
        Method::GET | Method::HEAD => ContainerOperation::Retrieve(retrieval(parts)),
        Method::PUT => {
            if is_multipart(&content_type) {
                return Err(SwordError::method_not_allowed(MULTIPART_NOT_SUPPORTED).into());
            }
            if !is_atom_entry(&content_type) {
                return Err(SwordError::bad_request("PUT to Edit-IRI MUST be an Atom Entry").into());
            }
            let deposit = entry_deposit(parts, &body, content_type, storage)?;
            ContainerOperation::ReplaceMetadata(deposit)
        }
        Method::POST => {
            if is_multipart(&content_type) {
                return Err(SwordError::method_not_allowed(MULTIPART_NOT_SUPPORTED).into());
            }
            if content_length(&parts.headers, body.len()) == 0 {
                let mut deposit = Deposit::new(Arc::clone(storage));
                deposit.content_type = content_type;
                deposit.in_progress = header_flag(&parts.headers, IN_PROGRESS)?;
                ContainerOperation::UseHeaders(deposit)
            } else if is_atom_entry(&content_type) {
                let deposit = entry_deposit(parts, &body, content_type, storage)?;
                ContainerOperation::AddMetadata(deposit)
            } else {
                let flags = BinaryFlags {
                    in_progress: true,
                    metadata_relevant: true,
                };
                let deposit =
                    binary_deposit(parts, body, content_type, flags, storage, config).await?;
                ContainerOperation::AddResources(deposit)
            }
        }
        Method::DELETE => ContainerOperation::Delete,
        ref other => {
            return Err(SwordError::method_not_allowed(format!(
                "Method {other} is not supported on a container"
            ))
            .into());
        }
    };

    debug!(method = %parts.method, operation = %op, "classified container request");
    Ok(op)
}

/// Classify a request against a media resource (EM-IRI).
pub async fn classify_media_resource(
    parts: &Parts,
    body: Bytes,
    storage: &Arc<dyn TempStorage>,
    config: &SwordConfig,
) -> Result<MediaResourceOperation, EngineError> {
    let content_type = content_type(&parts.headers);

    let op = match parts.method {
        Method::GET | Method::HEAD => MediaResourceOperation::Retrieve(retrieval(parts)),
        Method::PUT | Method::POST if is_multipart(&content_type) => {
            return Err(SwordError::method_not_allowed(MULTIPART_NOT_SUPPORTED).into());
        }
        Method::PUT => {
            let flags = BinaryFlags {
                in_progress: false,
                metadata_relevant: false,
            };
            let deposit = binary_deposit(parts, body, content_type, flags, storage, config).await?;
            MediaResourceOperation::ReplaceResource(deposit)
        }
        Method::POST => {
            let flags = BinaryFlags {
                in_progress: true,
                metadata_relevant: true,
            };
            let deposit = binary_deposit(parts, body, content_type, flags, storage, config).await?;
            MediaResourceOperation::AddResource(deposit)
        }
        Method::DELETE => MediaResourceOperation::Delete,
        ref other => {
            return Err(SwordError::method_not_allowed(format!(
                "Method {other} is not supported on a media resource"
            ))
            .into());
        }
    };

    debug!(method = %parts.method, operation = %op, "classified media resource request");
    Ok(op)
}

fn retrieval(parts: &Parts) -> Retrieval {
    Retrieval {
        accept: AcceptHeaders::from_headers(&parts.headers),
        head: parts.method == Method::HEAD,
    }
}

fn entry_deposit(
    parts: &Parts,
    body: &[u8],
    content_type: String,
    storage: &Arc<dyn TempStorage>,
) -> Result<Deposit, EngineError> {
    let in_progress = header_flag(&parts.headers, IN_PROGRESS)?;
    let entry = swordstack_xml::entry_from_xml(body).map_err(|e| {
        SwordError::bad_request("Unable to parse the Atom entry")
            .with_verbose_description(e.to_string())
            .with_source(e)
    })?;

    let mut deposit = Deposit::new(Arc::clone(storage));
    deposit.content_type = content_type;
    deposit.content_length = content_length(&parts.headers, body.len());
    deposit.slug = header_string(&parts.headers, SLUG);
    deposit.in_progress = in_progress;
    deposit.entry = Some(entry);
    Ok(deposit)
}

async fn binary_deposit(
    parts: &Parts,
    body: Bytes,
    content_type: String,
    flags: BinaryFlags,
    storage: &Arc<dyn TempStorage>,
    config: &SwordConfig,
) -> Result<Deposit, EngineError> {
    let headers = &parts.headers;
    let mut deposit = Deposit::new(Arc::clone(storage));
    if flags.in_progress {
        deposit.in_progress = header_flag(headers, IN_PROGRESS)?;
    }
    if flags.metadata_relevant {
        deposit.metadata_relevant = header_flag(headers, METADATA_RELEVANT)?;
    }

    deposit.content_length = content_length(headers, body.len());
    deposit.content_type = content_type;
    deposit.packaging =
        Some(header_string(headers, PACKAGING).unwrap_or_else(|| PACKAGE_BINARY.to_owned()));
    deposit.slug = header_string(headers, SLUG);
    deposit.filename = header_str(headers, CONTENT_DISPOSITION).and_then(content_disposition_filename);
    deposit.md5 = header_string(headers, CONTENT_MD5);

    let actual_md5 = compute_md5(&body);
    let received = body.len() as u64;
    deposit.spool_payload(body).await?;

    if let Some(expected) = deposit.md5.as_deref() {
        if !expected.eq_ignore_ascii_case(&actual_md5) {
            return Err(SwordError::checksum_mismatch(expected, &actual_md5).into());
        }
    }

    if let Some(limit) = config.max_upload_size {
        if received > limit {
            return Err(SwordError::max_upload_size_exceeded(limit).into());
        }
    }

    Ok(deposit)
}
