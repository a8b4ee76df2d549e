//! HTTP Basic credential parsing.
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! Basic <base64(username ":" password)>
//! ```
//!
//! The scheme is matched case-insensitively. The password may contain `:`;
//! only the first one separates it from the username.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::AuthError;

/// A parsed `user:password` pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Parse the value of an `Authorization` header.
///
/// # Examples
///
/// ```
/// use swordstack_auth::basic::parse_basic;
///
/// let creds = parse_basic("Basic c3dvcmQ6c2VjcmV0").unwrap();
/// assert_eq!(creds.username, "sword");
/// assert_eq!(creds.password, "secret");
/// ```
pub fn parse_basic(header: &str) -> Result<BasicCredentials, AuthError> {
    let header = header.trim();
    let (scheme, encoded) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::UnsupportedScheme(scheme.to_owned()));
    }

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

    let (username, password) = decoded.split_once(':').ok_or(AuthError::InvalidAuthHeader)?;
    Ok(BasicCredentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}
