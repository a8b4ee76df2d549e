//! Shared engine state handed to every request.

use std::fmt;
use std::sync::Arc;

use swordstack_auth::CredentialVerifier;
use swordstack_core::{FileSpool, SwordConfig, TempStorage};
use typed_builder::TypedBuilder;

use crate::manager::{ContainerManager, MediaResourceManager, StatementManager};

/// The deposit engine: configuration plus the repository collaborators.
///
/// Holds no per-request state; cloning is cheap.
///
/// # Examples
///
/// ```ignore
/// let engine = SwordEngine::builder()
///     .config(Arc::new(SwordConfig::from_env()))
///     .container_manager(repo.clone())
///     .media_resource_manager(repo.clone())
///     .statement_manager(repo)
///     .build();
/// ```
#[derive(Clone, TypedBuilder)]
pub struct SwordEngine {
    /// Server configuration.
    pub config: Arc<SwordConfig>,
    /// Container (Edit-IRI) operations.
    pub container_manager: Arc<dyn ContainerManager>,
    /// Media resource (EM-IRI) operations.
    pub media_resource_manager: Arc<dyn MediaResourceManager>,
    /// Statement retrieval.
    pub statement_manager: Arc<dyn StatementManager>,
    /// Identity store. `None` accepts any well-formed credentials.
    #[builder(default, setter(strip_option))]
    pub credential_verifier: Option<Arc<dyn CredentialVerifier>>,
    /// Buffer for binary deposits.
    #[builder(default = default_storage(&config))]
    pub temp_storage: Arc<dyn TempStorage>,
}

fn default_storage(config: &SwordConfig) -> Arc<dyn TempStorage> {
    Arc::new(FileSpool::new(config.temp_directory.clone()))
}

impl fmt::Debug for SwordEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwordEngine")
            .field("config", &self.config)
            .field("has_credential_verifier", &self.credential_verifier.is_some())
            .field("temp_storage", &self.temp_storage)
            .finish_non_exhaustive()
    }
}
