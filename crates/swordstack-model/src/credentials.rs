//! Request-scoped credentials.

use std::fmt;

/// Credentials extracted from a request.
///
/// Immutable once built. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AuthCredentials {
    username: Option<String>,
    password: Option<String>,
    on_behalf_of: Option<String>,
}

impl AuthCredentials {
    /// Credentials for an authenticated principal.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        on_behalf_of: Option<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            on_behalf_of,
        }
    }

    /// Anonymous credentials, optionally still mediated.
    #[must_use]
    pub fn anonymous(on_behalf_of: Option<String>) -> Self {
        Self {
            username: None,
            password: None,
            on_behalf_of,
        }
    }

    /// Whether no principal was supplied.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }

    /// Principal identifier.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Secret supplied with the principal.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Identity the principal deposits on behalf of.
    #[must_use]
    pub fn on_behalf_of(&self) -> Option<&str> {
        self.on_behalf_of.as_deref()
    }
}

impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("on_behalf_of", &self.on_behalf_of)
            .finish()
    }
}
