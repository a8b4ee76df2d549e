//! Identity store trait and an in-memory implementation.

use std::collections::HashMap;
use std::fmt;

use subtle::ConstantTimeEq;
use swordstack_model::{AuthCredentials, AuthFailure};
use tracing::debug;

use crate::error::AuthError;

/// Checks a username and password against an identity store.
///
/// Implementations may back this with a database, a directory service, or
/// any other store.
pub trait CredentialVerifier: Send + Sync {
    /// Accept or refuse the pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownUser`] or [`AuthError::InvalidPassword`].
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// In-memory identity store backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use swordstack_auth::credentials::{CredentialVerifier, StaticCredentialStore};
///
/// let store = StaticCredentialStore::new(vec![("sword".to_owned(), "sword".to_owned())]);
/// assert!(store.verify("sword", "sword").is_ok());
/// assert!(store.verify("sword", "wrong").is_err());
/// ```
#[derive(Clone)]
pub struct StaticCredentialStore {
    users: HashMap<String, String>,
}

impl StaticCredentialStore {
    /// Create a store from `(username, password)` pairs.
    pub fn new(users: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }
}

impl fmt::Debug for StaticCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialStore")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialVerifier for StaticCredentialStore {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let expected = self
            .users
            .get(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_owned()))?;

        if expected.as_bytes().ct_eq(password.as_bytes()).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidPassword)
        }
    }
}

/// Run extracted credentials through `verifier`.
///
/// Anonymous credentials are not verified.
pub fn verify_credentials(
    verifier: &dyn CredentialVerifier,
    credentials: &AuthCredentials,
) -> Result<(), AuthFailure> {
    let (Some(username), Some(password)) = (credentials.username(), credentials.password()) else {
        return Ok(());
    };
    verifier.verify(username, password).map_err(|e| {
        debug!(username, error = %e, "credentials rejected");
        AuthFailure::from(e)
    })
}
