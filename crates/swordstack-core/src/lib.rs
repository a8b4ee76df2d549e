//! Core building blocks shared by every SwordStack crate.
//!
//! - [`config`]: [`SwordConfig`], the environment-driven server configuration.
//! - [`checksums`]: stateless MD5 helpers used for `Content-MD5` headers and
//!   deposit verification.
//! - [`dates`]: HTTP and Atom timestamp formatting.
//! - [`spool`]: the temporary-storage provider that buffers deposit payloads,
//!   and the [`ArtifactGuard`] that releases them exactly once per request.

pub mod checksums;
pub mod config;
pub mod dates;
pub mod spool;

pub use config::SwordConfig;
pub use spool::{ArtifactGuard, FileSpool, SpoolError, TempArtifact, TempStorage};
