//! Media resource (EM-IRI) endpoint.
//!
//! | Method | Manager call | Success |
//! |--------|--------------|---------|
//! | GET/HEAD | `get_media_resource_representation` | 200 |
//! | PUT | `replace_media_resource` | 204 + `Location` |
//! | POST | `add_resource` | 201 + `Location`, receipt body when enabled |
//! | DELETE | `delete_media_resource` | 204 |
//!
//! GET and HEAD honour `allow_unauthenticated_media_access`; every other
//! method requires credentials.

use bytes::Bytes;
use http::request::Parts;
use http::{Method, StatusCode};
use http_body::Body;
use swordstack_model::{EngineError, MediaResourceOperation, Retrieval, ServerFault};
use tracing::info;

use crate::auth::authorize;
use crate::classify::classify_media_resource;
use crate::engine::SwordEngine;
use crate::request::{full_iri, read_body};
use crate::response::{
    SwordResponse, deposit_response, engine_error_to_response, location_response, media_response,
    no_content,
};

/// Serve one media resource request.
pub async fn handle<B>(
    engine: &SwordEngine,
    parts: &Parts,
    body: B,
) -> Result<SwordResponse, ServerFault>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match process(engine, parts, body).await {
        Ok(resp) => Ok(resp),
        Err(err) => engine_error_to_response(err, &engine.config),
    }
}

async fn process<B>(
    engine: &SwordEngine,
    parts: &Parts,
    body: B,
) -> Result<SwordResponse, EngineError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let config = engine.config.as_ref();
    let iri = full_iri(parts);
    let anonymous_read = matches!(parts.method, Method::GET | Method::HEAD)
        && config.allow_unauthenticated_media_access;
    let auth = authorize(engine, &parts.headers, anonymous_read)?;
    let body = read_body(body, &parts.headers, config.max_upload_size).await?;
    let op = classify_media_resource(parts, body, &engine.temp_storage, config).await?;
    info!(method = %parts.method, iri = %iri, operation = %op, "media resource request");

    let manager = engine.media_resource_manager.as_ref();
    let resp = match op {
        MediaResourceOperation::Retrieve(Retrieval { accept, head }) => {
            let media = manager
                .get_media_resource_representation(&iri, &accept, &auth, config)
                .await?;
            media_response(media, head)?
        }
        MediaResourceOperation::ReplaceResource(deposit) => {
            let receipt = manager
                .replace_media_resource(&iri, &deposit, &auth, config)
                .await?
                .resolve();
            if receipt.location.is_none() {
                return Err(ServerFault::new(
                    "repository returned a deposit receipt without a location",
                )
                .into());
            }
            location_response(&receipt, StatusCode::NO_CONTENT)?
        }
        MediaResourceOperation::AddResource(deposit) => {
            let receipt = manager.add_resource(&iri, &deposit, &auth, config).await?;
            deposit_response(&receipt.resolve(), true, true, config)?
        }
        MediaResourceOperation::Delete => {
            manager.delete_media_resource(&iri, &auth, config).await?;
            no_content()?
        }
    };
    Ok(resp)
}
