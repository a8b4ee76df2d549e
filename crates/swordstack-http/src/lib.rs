//! HTTP layer for the SwordStack deposit engine.
//!
//! This crate turns hyper requests into calls on the repository collaborators
//! defined in [`manager`], and their results into SWORD responses.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> SwordHttpService (hyper Service impl, health check, routing)
//!   -> container / media_resource endpoint
//!        -> authorize (Basic auth, identity store, mediation policy)
//!        -> classify (exactly one operation variant, payload spooling)
//!        -> manager call
//!   -> response assembly (receipt, statement, media, error document)
//! HTTP Response
//! ```
//!
//! # Modules
//!
//! - [`auth`] - Per-request authorization
//! - [`body`] - Response body type
//! - [`classify`] - Request classification into operation variants
//! - [`container`] - Edit-IRI endpoint
//! - [`engine`] - Shared engine state
//! - [`manager`] - Repository collaborator traits
//! - [`media_resource`] - EM-IRI endpoint
//! - [`request`] - Request header helpers
//! - [`response`] - Response assembly
//! - [`server`] - Listener, accept loop and tracing setup
//! - [`service`] - Hyper `Service` implementation

pub mod auth;
pub mod body;
pub mod classify;
pub mod container;
pub mod engine;
pub mod manager;
pub mod media_resource;
pub mod request;
pub mod response;
pub mod server;
pub mod service;

#[cfg(test)]
mod test_support;

pub use body::SwordResponseBody;
pub use engine::SwordEngine;
pub use manager::{ContainerManager, MediaResourceManager, StatementManager};
pub use response::SwordResponse;
pub use server::{bind, init_tracing, serve};
pub use service::SwordHttpService;
