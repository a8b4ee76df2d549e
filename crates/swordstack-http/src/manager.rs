//! Repository collaborator traits.
//!
//! The engine owns no storage. Every operation is delegated to one of these
//! traits, which the embedding repository implements. All methods receive the
//! full request IRI, the authenticated credentials, and the server
//! configuration.

use async_trait::async_trait;
use swordstack_core::SwordConfig;
use swordstack_model::{
    AcceptHeaders, AuthCredentials, Deposit, DepositReceipt, MediaResource, Statement,
    SwordResult,
};

/// Operations on containers, addressed by Edit-IRI.
#[async_trait]
pub trait ContainerManager: Send + Sync {
    /// Deposit receipt for a container.
    async fn get_entry(
        &self,
        edit_iri: &str,
        accept: &AcceptHeaders,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Replace the container's metadata with the deposited entry.
    async fn replace_metadata(
        &self,
        edit_iri: &str,
        deposit: &Deposit,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Merge the deposited entry into the container's metadata.
    async fn add_metadata(
        &self,
        edit_iri: &str,
        deposit: &Deposit,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Add the deposited binary payload to the container.
    async fn add_resources(
        &self,
        edit_iri: &str,
        deposit: &Deposit,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Act on headers alone, typically completing an in-progress deposit.
    async fn use_headers(
        &self,
        edit_iri: &str,
        deposit: &Deposit,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Delete the container.
    async fn delete_container(
        &self,
        edit_iri: &str,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<()>;

    /// Whether a retrieval negotiates the statement rather than the receipt.
    async fn is_statement_request(
        &self,
        edit_iri: &str,
        accept: &AcceptHeaders,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<bool>;
}

/// Operations on media resources, addressed by EM-IRI.
#[async_trait]
pub trait MediaResourceManager: Send + Sync {
    /// Content of the media resource.
    async fn get_media_resource_representation(
        &self,
        em_iri: &str,
        accept: &AcceptHeaders,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<MediaResource>;

    /// Replace the media resource with the deposited payload.
    async fn replace_media_resource(
        &self,
        em_iri: &str,
        deposit: &Deposit,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Add the deposited payload to the media resource.
    async fn add_resource(
        &self,
        em_iri: &str,
        deposit: &Deposit,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<DepositReceipt>;

    /// Delete the media resource content.
    async fn delete_media_resource(
        &self,
        em_iri: &str,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<()>;
}

/// Produces statements for containers.
#[async_trait]
pub trait StatementManager: Send + Sync {
    /// Statement for the container at `iri`, in the negotiated format.
    async fn get_statement(
        &self,
        iri: &str,
        accept: &AcceptHeaders,
        auth: &AuthCredentials,
        config: &SwordConfig,
    ) -> SwordResult<Statement>;
}
