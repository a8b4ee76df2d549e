//! Deposit server configuration.
//!
//! Provides [`SwordConfig`] for configuring the protocol engine and its hyper
//! transport. Values are loaded from environment variables via
//! [`SwordConfig::from_env`], falling back to the defaults documented there.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

/// Default generator URI written into deposit receipts and error documents.
pub const DEFAULT_GENERATOR_URL: &str = "https://swordstack.dev/server";

/// Server configuration.
///
/// # Examples
///
/// ```
/// use swordstack_core::config::SwordConfig;
///
/// let config = SwordConfig::default();
/// assert!(config.return_deposit_receipt);
/// assert_eq!(config.auth_realm, "SWORD2");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SwordConfig {
    /// Bind address for the HTTP listener (e.g. `"0.0.0.0:8080"`), used by
    /// the HTTP crate's `bind` helper.
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Whether successful deposits return a receipt body.
    #[builder(default = true)]
    pub return_deposit_receipt: bool,

    /// Whether media resources may be retrieved without credentials.
    ///
    /// When enabled, a request without an `Authorization` header is served
    /// anonymously instead of being challenged, so the same endpoint cannot
    /// challenge some clients and serve others anonymously.
    #[builder(default = false)]
    pub allow_unauthenticated_media_access: bool,

    /// Whether clients may deposit on behalf of another user (`On-Behalf-Of`).
    #[builder(default = true)]
    pub allow_mediation: bool,

    /// Realm advertised in `WWW-Authenticate` challenges.
    #[builder(default = String::from("SWORD2"))]
    pub auth_realm: String,

    /// Generator URI added to receipts and error documents. `None` disables
    /// the generator element.
    #[builder(default = Some(String::from(DEFAULT_GENERATOR_URL)))]
    pub generator_url: Option<String>,

    /// Generator version attribute.
    #[builder(default = String::from(env!("CARGO_PKG_VERSION")))]
    pub generator_version: String,

    /// Administrator contact, written as the generator element's text.
    #[builder(default)]
    pub administrator_email: Option<String>,

    /// Directory for buffered deposit payloads. `None` uses the OS temp dir.
    #[builder(default)]
    pub temp_directory: Option<PathBuf>,

    /// Largest accepted binary deposit, in bytes. `None` means unlimited.
    #[builder(default)]
    pub max_upload_size: Option<u64>,

    /// Alternate (human-readable) link added to error documents.
    #[builder(default)]
    pub alternate_url: Option<String>,

    /// Media type of [`Self::alternate_url`].
    #[builder(default)]
    pub alternate_url_content_type: Option<String>,

    /// Path prefix served by the container endpoint.
    #[builder(default = String::from("/edit/"))]
    pub container_path: String,

    /// Path prefix served by the media-resource endpoint.
    #[builder(default = String::from("/edit-media/"))]
    pub media_path: String,
}

impl Default for SwordConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SwordConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `LOG_LEVEL` | `info` |
    /// | `SWORD_RETURN_DEPOSIT_RECEIPT` | `true` |
    /// | `SWORD_ALLOW_UNAUTHENTICATED_MEDIA_ACCESS` | `false` |
    /// | `SWORD_ALLOW_MEDIATION` | `true` |
    /// | `SWORD_AUTH_REALM` | `SWORD2` |
    /// | `SWORD_GENERATOR_URL` | `https://swordstack.dev/server` (empty disables) |
    /// | `SWORD_GENERATOR_VERSION` | crate version |
    /// | `SWORD_ADMIN_EMAIL` | *(unset)* |
    /// | `SWORD_TEMP_DIRECTORY` | *(OS temp dir)* |
    /// | `SWORD_MAX_UPLOAD_SIZE` | *(unlimited)* |
    /// | `SWORD_ALTERNATE_URL` | *(unset)* |
    /// | `SWORD_ALTERNATE_URL_CONTENT_TYPE` | *(unset)* |
    /// | `SWORD_CONTAINER_PATH` | `/edit/` |
    /// | `SWORD_MEDIA_PATH` | `/edit-media/` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("SWORD_RETURN_DEPOSIT_RECEIPT") {
            config.return_deposit_receipt = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("SWORD_ALLOW_UNAUTHENTICATED_MEDIA_ACCESS") {
            config.allow_unauthenticated_media_access = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("SWORD_ALLOW_MEDIATION") {
            config.allow_mediation = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("SWORD_AUTH_REALM") {
            config.auth_realm = v;
        }
        if let Ok(v) = std::env::var("SWORD_GENERATOR_URL") {
            config.generator_url = non_empty(v);
        }
        if let Ok(v) = std::env::var("SWORD_GENERATOR_VERSION") {
            config.generator_version = v;
        }
        if let Ok(v) = std::env::var("SWORD_ADMIN_EMAIL") {
            config.administrator_email = non_empty(v);
        }
        if let Ok(v) = std::env::var("SWORD_TEMP_DIRECTORY") {
            config.temp_directory = non_empty(v).map(PathBuf::from);
        }
        if let Ok(v) = std::env::var("SWORD_MAX_UPLOAD_SIZE") {
            config.max_upload_size = parse_upload_size(&v);
        }
        if let Ok(v) = std::env::var("SWORD_ALTERNATE_URL") {
            config.alternate_url = non_empty(v);
        }
        if let Ok(v) = std::env::var("SWORD_ALTERNATE_URL_CONTENT_TYPE") {
            config.alternate_url_content_type = non_empty(v);
        }
        if let Ok(v) = std::env::var("SWORD_CONTAINER_PATH") {
            config.container_path = v;
        }
        if let Ok(v) = std::env::var("SWORD_MEDIA_PATH") {
            config.media_path = v;
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Parse an upload limit in bytes. Blank means unlimited; anything else
/// unparseable is reported and also treated as unlimited.
fn parse_upload_size(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<u64>() {
        Ok(limit) => Some(limit),
        Err(e) => {
            warn!(value, error = %e, "ignoring invalid SWORD_MAX_UPLOAD_SIZE, uploads are unlimited");
            None
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
