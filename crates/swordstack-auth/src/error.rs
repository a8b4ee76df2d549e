//! Error types for credential extraction and verification.

use swordstack_model::AuthFailure;

/// Errors that can occur while authenticating a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header is not valid header text or lacks a
    /// `user:password` pair.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The scheme is not `Basic`.
    #[error("Unsupported authorization scheme: {0}")]
    UnsupportedScheme(String),

    /// The credentials are not valid base64 or not UTF-8.
    #[error("Invalid credential encoding")]
    InvalidEncoding,

    /// The username is not known to the identity store.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// The password does not match.
    #[error("Invalid password")]
    InvalidPassword,
}

impl From<AuthError> for AuthFailure {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuthHeader => Self::Retry,
            AuthError::InvalidAuthHeader
            | AuthError::UnsupportedScheme(_)
            | AuthError::InvalidEncoding => Self::Malformed(err.to_string()),
            AuthError::UnknownUser(_) | AuthError::InvalidPassword => {
                Self::Rejected(err.to_string())
            }
        }
    }
}
