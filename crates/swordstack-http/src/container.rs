//! Container (Edit-IRI) endpoint.
//!
//! | Method | Manager call | Success |
//! |--------|--------------|---------|
//! | GET/HEAD | `is_statement_request`, then `get_statement` or `get_entry` | 200 |
//! | PUT | `replace_metadata` | 200 with receipt, 204 without |
//! | POST | `add_metadata` / `use_headers` / `add_resources` | 200 with receipt, 204 without |
//! | DELETE | `delete_container` | 204 |

use bytes::Bytes;
use http::StatusCode;
use http::request::Parts;
use http_body::Body;
use swordstack_model::{ContainerOperation, EngineError, Retrieval, ServerFault};
use tracing::{debug, info};

use crate::auth::authorize;
use crate::classify::classify_container;
use crate::engine::SwordEngine;
use crate::request::{full_iri, read_body};
use crate::response::{
    SwordResponse, deposit_response, engine_error_to_response, no_content, receipt_response,
    statement_response,
};

/// Serve one container request.
///
/// Protocol and authentication failures become responses; only server faults
/// are returned as errors.
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
    let auth = authorize(engine, &parts.headers, false)?;
    let body = read_body(body, &parts.headers, config.max_upload_size).await?;
    let op = classify_container(parts, body, &engine.temp_storage, config).await?;
    info!(method = %parts.method, iri = %iri, operation = %op, "container request");

    let manager = engine.container_manager.as_ref();
    let resp = match op {
        ContainerOperation::Retrieve(Retrieval { accept, head }) => {
            if manager
                .is_statement_request(&iri, &accept, &auth, config)
                .await?
            {
                debug!(iri = %iri, "serving statement");
                let statement = engine
                    .statement_manager
                    .get_statement(&iri, &accept, &auth, config)
                    .await?;
                statement_response(statement, head)?
            } else {
                let receipt = manager.get_entry(&iri, &accept, &auth, config).await?;
                receipt_response(&receipt.resolve(), StatusCode::OK, head, config)?
            }
        }
        ContainerOperation::ReplaceMetadata(deposit) => {
            let receipt = manager
                .replace_metadata(&iri, &deposit, &auth, config)
                .await?;
            deposit_response(&receipt.resolve(), false, true, config)?
        }
        ContainerOperation::AddMetadata(deposit) => {
            let receipt = manager.add_metadata(&iri, &deposit, &auth, config).await?;
            deposit_response(&receipt.resolve(), false, false, config)?
        }
        ContainerOperation::UseHeaders(deposit) => {
            let receipt = manager.use_headers(&iri, &deposit, &auth, config).await?;
            deposit_response(&receipt.resolve(), false, false, config)?
        }
        ContainerOperation::AddResources(deposit) => {
            let receipt = manager.add_resources(&iri, &deposit, &auth, config).await?;
            deposit_response(&receipt.resolve(), false, false, config)?
        }
        ContainerOperation::Delete => {
            manager.delete_container(&iri, &auth, config).await?;
            no_content()?
        }
    };
    Ok(resp)
}
