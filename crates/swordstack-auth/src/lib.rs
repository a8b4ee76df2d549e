//! HTTP Basic authentication for the SwordStack deposit engine.
//!
//! # Modules
//!
//! - [`basic`] - `Authorization: Basic` parsing
//! - [`credentials`] - Identity store trait and in-memory implementation
//! - [`error`] - Authentication error types
//! - [`gate`] - Credential extraction with retry / malformed classification

pub mod basic;
pub mod credentials;
pub mod error;
pub mod gate;

pub use credentials::{CredentialVerifier, StaticCredentialStore, verify_credentials};
pub use error::AuthError;
pub use gate::{ON_BEHALF_OF, authenticate, challenge};
