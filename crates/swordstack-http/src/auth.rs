//! Per-request authorization: extraction, identity check, mediation policy.

use http::HeaderMap;
use swordstack_auth::{authenticate, verify_credentials};
use swordstack_model::{AuthCredentials, EngineError, SwordError};
use tracing::debug;

use crate::engine::SwordEngine;

/// Authenticate the request and apply the mediation policy.
///
/// `allow_unauthenticated` serves credential-less requests anonymously
/// instead of challenging them.
pub fn authorize(
    engine: &SwordEngine,
    headers: &HeaderMap,
    allow_unauthenticated: bool,
) -> Result<AuthCredentials, EngineError> {
    let credentials = authenticate(headers, allow_unauthenticated)?;

    if let Some(verifier) = &engine.credential_verifier {
        verify_credentials(verifier.as_ref(), &credentials)?;
    }

    if let Some(obo) = credentials.on_behalf_of() {
        if !engine.config.allow_mediation {
            debug!(on_behalf_of = obo, "mediated deposit refused");
            return Err(SwordError::mediation_not_allowed().into());
        }
    }

    Ok(credentials)
}
