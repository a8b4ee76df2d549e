//! Error taxonomy of the deposit engine.
//!
//! Three disjoint kinds reach an endpoint boundary, wrapped by [`EngineError`]:
//!
//! - [`SwordError`]: a protocol violation, rendered as a SWORD error document
//!   with the status carried by the error.
//! - [`ServerFault`]: an unexpected collaborator failure, surfaced to the
//!   transport as an internal error without a structured body.
//! - [`AuthFailure`]: a credential problem, split into retry (401 with a
//!   challenge), malformed (400), and rejected (403).

use std::fmt;

use swordstack_core::SpoolError;

use crate::uri;

/// Registry of SWORD error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum SwordErrorCode {
    /// Malformed request.
    #[default]
    BadRequest,
    /// Unsupported or unacceptable content.
    ErrorContent,
    /// Supplied checksum does not match the payload.
    ChecksumMismatch,
    /// `On-Behalf-Of` user is unknown to the repository.
    TargetOwnerUnknown,
    /// Mediated deposit is disabled.
    MediationNotAllowed,
    /// Method not supported on this resource.
    MethodNotAllowed,
    /// Payload exceeds the upload limit.
    MaxUploadSizeExceeded,
    /// Repository-specific error URI.
    Custom(&'static str),
}

impl SwordErrorCode {
    /// Full error URI written into the `href` of the error document.
    #[must_use]
    pub fn uri(&self) -> &'static str {
        match self {
            Self::BadRequest => uri::ERROR_BAD_REQUEST,
            Self::ErrorContent => uri::ERROR_CONTENT,
            Self::ChecksumMismatch => uri::ERROR_CHECKSUM_MISMATCH,
            Self::TargetOwnerUnknown => uri::ERROR_TARGET_OWNER_UNKNOWN,
            Self::MediationNotAllowed => uri::ERROR_MEDIATION_NOT_ALLOWED,
            Self::MethodNotAllowed => uri::ERROR_METHOD_NOT_ALLOWED,
            Self::MaxUploadSizeExceeded => uri::ERROR_MAX_UPLOAD_SIZE_EXCEEDED,
            Self::Custom(uri) => *uri,
        }
    }

    /// Short name of the error type (the last URI segment).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        let uri = self.uri();
        uri.rsplit('/').next().unwrap_or(uri)
    }

    /// Status used when the raiser does not choose one.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::BadRequest | Self::Custom(_) => http::StatusCode::BAD_REQUEST,
            Self::ErrorContent => http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ChecksumMismatch | Self::MediationNotAllowed => {
                http::StatusCode::PRECONDITION_FAILED
            }
            Self::TargetOwnerUnknown => http::StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::MaxUploadSizeExceeded => http::StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Message used when the raiser does not supply one.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be understood",
            Self::ErrorContent => "The supplied content type is not acceptable",
            Self::ChecksumMismatch => "The checksum of the received content does not match",
            Self::TargetOwnerUnknown => "The On-Behalf-Of user is not known",
            Self::MediationNotAllowed => "Mediated deposit is not supported",
            Self::MethodNotAllowed => "The method is not allowed on this resource",
            Self::MaxUploadSizeExceeded => "The deposit exceeds the maximum upload size",
            Self::Custom(_) => "The request failed",
        }
    }
}

impl fmt::Display for SwordErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protocol error, rendered as a SWORD error document.
#[derive(Debug)]
pub struct SwordError {
    /// The error type.
    pub code: SwordErrorCode,
    /// Human-readable summary.
    pub message: String,
    /// Longer diagnostic text for `sword:verboseDescription`.
    pub verbose_description: Option<String>,
    /// HTTP status of the response.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for SwordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwordError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for SwordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl SwordError {
    /// Create an error with the code's default message and status.
    #[must_use]
    pub fn new(code: SwordErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_owned(),
            verbose_description: None,
            status_code: code.default_status_code(),
            source: None,
        }
    }

    /// Create an error with a custom message.
    #[must_use]
    pub fn with_message(code: SwordErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::new(code)
        }
    }

    /// Override the response status.
    #[must_use]
    pub fn with_status(mut self, status: http::StatusCode) -> Self {
        self.status_code = status;
        self
    }

    /// Attach a verbose description.
    #[must_use]
    pub fn with_verbose_description(mut self, description: impl Into<String>) -> Self {
        self.verbose_description = Some(description.into());
        self
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Malformed request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(SwordErrorCode::BadRequest, message)
    }

    /// Method (or multipart upload) not supported.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::with_message(SwordErrorCode::MethodNotAllowed, message)
    }

    /// Unsupported content.
    #[must_use]
    pub fn error_content(message: impl Into<String>) -> Self {
        Self::with_message(SwordErrorCode::ErrorContent, message)
    }

    /// `Content-MD5` does not match the received bytes.
    #[must_use]
    pub fn checksum_mismatch(expected: &str, actual: &str) -> Self {
        Self::with_message(
            SwordErrorCode::ChecksumMismatch,
            format!("The received MD5 checksum {actual} does not match the supplied {expected}"),
        )
    }

    /// Payload larger than the configured limit.
    #[must_use]
    pub fn max_upload_size_exceeded(limit: u64) -> Self {
        Self::with_message(
            SwordErrorCode::MaxUploadSizeExceeded,
            format!("The deposit exceeds the maximum upload size of {limit} bytes"),
        )
    }

    /// Mediated deposit is disabled.
    #[must_use]
    pub fn mediation_not_allowed() -> Self {
        Self::new(SwordErrorCode::MediationNotAllowed)
    }

    /// `On-Behalf-Of` user is unknown.
    #[must_use]
    pub fn target_owner_unknown(owner: &str) -> Self {
        Self::with_message(
            SwordErrorCode::TargetOwnerUnknown,
            format!("The user {owner} is not known"),
        )
    }

    /// Resource does not exist (404).
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::bad_request(message).with_status(http::StatusCode::NOT_FOUND)
    }

    /// Resource existed but has been removed (410).
    #[must_use]
    pub fn gone(message: impl Into<String>) -> Self {
        Self::bad_request(message).with_status(http::StatusCode::GONE)
    }
}

/// Convenience macro for creating a [`SwordError`].
///
/// # Examples
///
/// ```
/// use swordstack_model::sword_error;
///
/// let err = sword_error!(MethodNotAllowed, "Multipart upload is not supported");
/// assert_eq!(err.status_code, http::StatusCode::METHOD_NOT_ALLOWED);
/// ```
#[macro_export]
macro_rules! sword_error {
    ($code:ident) => {
        $crate::error::SwordError::new($crate::error::SwordErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::SwordError::with_message($crate::error::SwordErrorCode::$code, $msg)
    };
}

/// An unexpected failure inside a collaborator or the transport.
#[derive(Debug, thiserror::Error)]
#[error("server fault: {message}")]
pub struct ServerFault {
    /// Description for the logs.
    pub message: String,
    /// The underlying error, if any.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ServerFault {
    /// Create a fault with no underlying error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a fault wrapping `source`.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A credential problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No credentials and anonymous access not permitted; the client should
    /// retry with credentials.
    #[error("authentication required")]
    Retry,
    /// Credentials present but unparseable.
    #[error("malformed credentials: {0}")]
    Malformed(String),
    /// Credentials parsed but refused by the identity store.
    #[error("credentials rejected: {0}")]
    Rejected(String),
}

impl AuthFailure {
    /// Whether the client should be challenged to retry.
    #[must_use]
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry)
    }
}

/// Any failure reaching an endpoint boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Protocol violation.
    #[error(transparent)]
    Protocol(#[from] SwordError),
    /// Unexpected collaborator failure.
    #[error(transparent)]
    Server(#[from] ServerFault),
    /// Authentication failure.
    #[error(transparent)]
    Auth(#[from] AuthFailure),
}

impl From<SpoolError> for EngineError {
    fn from(err: SpoolError) -> Self {
        Self::Server(ServerFault::with_source("temporary storage failed", err))
    }
}

/// Result type returned by collaborators and the engine.
pub type SwordResult<T> = Result<T, EngineError>;
