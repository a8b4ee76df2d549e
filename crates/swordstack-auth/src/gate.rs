//! Authentication gate.
//!
//! Extracts [`AuthCredentials`] from request headers and classifies failures:
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | no `Authorization`, anonymous not allowed | [`AuthFailure::Retry`] |
//! | no `Authorization`, anonymous allowed | anonymous credentials |
//! | header present but unparseable | [`AuthFailure::Malformed`] |
//!
//! Rejection by the identity store happens one layer up, in
//! [`crate::credentials::verify_credentials`].
//!
//! A caller passing `allow_unauthenticated = true` serves every
//! credential-less request anonymously, so that endpoint can never challenge
//! some of those requests while admitting others.

use http::HeaderMap;
use swordstack_model::{AuthCredentials, AuthFailure};
use tracing::debug;

use crate::basic::parse_basic;
use crate::error::AuthError;

/// Header naming the identity a mediated deposit is made for.
pub const ON_BEHALF_OF: &str = "on-behalf-of";

/// Value of the `WWW-Authenticate` header sent with a 401.
#[must_use]
pub fn challenge(realm: &str) -> String {
    format!("Basic realm=\"{realm}\"")
}

/// Extract credentials from `headers`.
pub fn authenticate(
    headers: &HeaderMap,
    allow_unauthenticated: bool,
) -> Result<AuthCredentials, AuthFailure> {
    let on_behalf_of = headers
        .get(ON_BEHALF_OF)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    let Some(value) = headers.get(http::header::AUTHORIZATION) else {
        if allow_unauthenticated {
            debug!("no credentials supplied, continuing anonymously");
            return Ok(AuthCredentials::anonymous(on_behalf_of));
        }
        return Err(AuthError::MissingAuthHeader.into());
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    let basic = parse_basic(value)?;

    debug!(username = %basic.username, on_behalf_of = ?on_behalf_of, "extracted credentials");
    Ok(AuthCredentials::new(basic.username, basic.password, on_behalf_of))
}
