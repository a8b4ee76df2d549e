//! In-memory collaborators shared by the unit tests of this crate.

use std::collections::HashMap;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use http_body::{Body, Frame};
use swordstack_core::{SpoolError, SwordConfig, TempArtifact, TempStorage};
use swordstack_model::{
    AcceptHeaders, AuthCredentials, Deposit, DepositReceipt, EngineError, MediaResource,
    Statement, SwordResult,
};

use crate::manager::{ContainerManager, MediaResourceManager, StatementManager};

/// Request body that yields one chunk and then a transport error.
#[derive(Debug, Default)]
pub struct BrokenBody {
    sent: bool,
}

impl Body for BrokenBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if self.sent {
            return Poll::Ready(Some(Err(std::io::Error::other("connection reset"))));
        }
        self.sent = true;
        Poll::Ready(Some(Ok(Frame::data(Bytes::from_static(b"partial")))))
    }
}

/// Keeps payloads in a map and counts stores and releases.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    payloads: Mutex<HashMap<String, Bytes>>,
    stored: AtomicUsize,
    release_calls: AtomicUsize,
    released: AtomicUsize,
}

impl MemoryStorage {
    pub fn shared() -> (Arc<Self>, Arc<dyn TempStorage>) {
        let storage = Arc::new(Self::default());
        let dyn_storage: Arc<dyn TempStorage> = storage.clone();
        (storage, dyn_storage)
    }

    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TempStorage for MemoryStorage {
    async fn store(&self, data: Bytes) -> Result<TempArtifact, SpoolError> {
        let n = self.stored.fetch_add(1, Ordering::SeqCst);
        let id = format!("mem-{n}");
        let size = data.len() as u64;
        self.payloads.lock().unwrap().insert(id.clone(), data);
        Ok(TempArtifact {
            path: PathBuf::from(format!("/memory/{id}")),
            id,
            size,
        })
    }

    async fn open(&self, artifact: &TempArtifact) -> Result<Bytes, SpoolError> {
        Ok(self
            .payloads
            .lock()
            .unwrap()
            .get(&artifact.id)
            .cloned()
            .unwrap_or_default())
    }

    fn release(&self, artifacts: &[TempArtifact]) {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.released.fetch_add(artifacts.len(), Ordering::SeqCst);
        let mut payloads = self.payloads.lock().unwrap();
        for artifact in artifacts {
            payloads.remove(&artifact.id);
        }
    }
}

/// Scripted repository: returns a fixed receipt, or a fixed error when one
/// is configured, and records the last operation it served.
#[derive(Debug, Default)]
pub struct MockRepository {
    pub receipt: DepositReceipt,
    pub statement: Option<Statement>,
    pub media: Option<MediaResource>,
    pub fail_with: Mutex<Option<EngineError>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockRepository {
    pub fn with_receipt(receipt: DepositReceipt) -> Self {
        Self {
            receipt,
            ..Self::default()
        }
    }

    pub fn fail_next(&self, err: impl Into<EngineError>) {
        *self.fail_with.lock().unwrap() = Some(err.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> SwordResult<()> {
        self.calls.lock().unwrap().push(call.to_owned());
        match self.fail_with.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerManager for MockRepository {
    async fn get_entry(
        &self,
        _edit_iri: &str,
        _accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("get_entry")?;
        Ok(self.receipt.clone())
    }

    async fn replace_metadata(
        &self,
        _edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("replace_metadata")?;
        Ok(self.receipt.clone())
    }

    async fn add_metadata(
        &self,
        _edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("add_metadata")?;
        Ok(self.receipt.clone())
    }

    async fn add_resources(
        &self,
        _edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("add_resources")?;
        Ok(self.receipt.clone())
    }

    async fn use_headers(
        &self,
        _edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("use_headers")?;
        Ok(self.receipt.clone())
    }

    async fn delete_container(
        &self,
        _edit_iri: &str,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<()> {
        self.record("delete_container")
    }

    async fn is_statement_request(
        &self,
        _edit_iri: &str,
        accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<bool> {
        Ok(self.statement.is_some()
            && accept
                .preferred()
                .is_some_and(|r| r.matches(swordstack_model::uri::CONTENT_TYPE_ORE)))
    }
}

#[async_trait]
impl MediaResourceManager for MockRepository {
    async fn get_media_resource_representation(
        &self,
        _em_iri: &str,
        _accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<MediaResource> {
        self.record("get_media_resource_representation")?;
        Ok(self
            .media
            .clone()
            .unwrap_or_else(|| MediaResource::new(Bytes::new())))
    }

    async fn replace_media_resource(
        &self,
        _em_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("replace_media_resource")?;
        Ok(self.receipt.clone())
    }

    async fn add_resource(
        &self,
        _em_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("add_resource")?;
        Ok(self.receipt.clone())
    }

    async fn delete_media_resource(
        &self,
        _em_iri: &str,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<()> {
        self.record("delete_media_resource")
    }
}

#[async_trait]
impl StatementManager for MockRepository {
    async fn get_statement(
        &self,
        _iri: &str,
        _accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<Statement> {
        self.record("get_statement")?;
        Ok(self
            .statement
            .clone()
            .unwrap_or_else(|| Statement::ore(Bytes::new())))
    }
}
