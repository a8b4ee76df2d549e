//! The hyper service.
//!
//! [`SwordHttpService`] handles:
//!
//! 1. Health check interception (`GET /health`)
//! 2. Routing by path prefix to the container or media-resource endpoint
//! 3. Turning server faults into `500` responses
//! 4. Common response headers (`Server`)
//!
//! The body is handed to the endpoint unread; it is collected only after the
//! request is authorized.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error};
use uuid::Uuid;

use crate::body::SwordResponseBody;
use crate::engine::SwordEngine;
use crate::response::SwordResponse;
use crate::{container, media_resource};

const SERVER_NAME: &str = "SwordStack";

/// Endpoint a request path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Container,
    MediaResource,
}

/// The deposit engine as a hyper service.
#[derive(Debug, Clone)]
pub struct SwordHttpService {
    engine: Arc<SwordEngine>,
}

impl SwordHttpService {
    /// Create a service around `engine`.
    #[must_use]
    pub fn new(engine: SwordEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Create a service from a shared engine.
    #[must_use]
    pub fn from_shared(engine: Arc<SwordEngine>) -> Self {
        Self { engine }
    }
}

impl Service<http::Request<Incoming>> for SwordHttpService {
    type Response = SwordResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let engine = Arc::clone(&self.engine);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, &engine, &request_id).await;
            Ok(add_common_headers(response))
        })
    }
}

/// Route and serve one request.
async fn process_request<B>(
    req: http::Request<B>,
    engine: &SwordEngine,
    request_id: &str,
) -> SwordResponse
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    debug!(%method, %path, request_id, "processing request");

    if is_health_check(&method, &path) {
        return health_check_response();
    }

    let Some(endpoint) = route(&path, engine) else {
        debug!(%path, request_id, "no endpoint for path");
        return status_response(StatusCode::NOT_FOUND);
    };

    let (parts, body) = req.into_parts();
    let result = match endpoint {
        Endpoint::Container => container::handle(engine, &parts, body).await,
        Endpoint::MediaResource => media_resource::handle(engine, &parts, body).await,
    };

    match result {
        Ok(resp) => {
            debug!(status = %resp.status(), request_id, "request served");
            resp
        }
        Err(fault) => {
            error!(error = %fault, source = ?fault.source, %method, %path, request_id, "server fault");
            status_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn route(path: &str, engine: &SwordEngine) -> Option<Endpoint> {
    let config = &engine.config;
    // Media first: a configured media prefix may nest under the container one.
    if path.starts_with(&config.media_path) {
        Some(Endpoint::MediaResource)
    } else if path.starts_with(&config.container_path) {
        Some(Endpoint::Container)
    } else {
        None
    }
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && path == "/health"
}

fn health_check_response() -> SwordResponse {
    let body = serde_json::json!({
        "status": "running",
        "service": "sword",
        "version": env!("CARGO_PKG_VERSION"),
    });
    http::Response::builder()
        .status(StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(SwordResponseBody::from_string(body.to_string()))
        .expect("static health response should be valid")
}

fn status_response(status: StatusCode) -> SwordResponse {
    http::Response::builder()
        .status(status)
        .body(SwordResponseBody::empty())
        .expect("static response should be valid")
}

fn add_common_headers(mut response: SwordResponse) -> SwordResponse {
    response.headers_mut().insert(
        http::header::SERVER,
        http::header::HeaderValue::from_static(SERVER_NAME),
    );
    response
}
