//! Integration tests for the SwordStack deposit engine.
//!
//! Each test starts the hyper server in-process on `127.0.0.1:0`, backed by a
//! recording repository, a counting file spool and an identity store that
//! knows [`USER`], and talks to it over real HTTP with `reqwest`.
//!
//! Run them with:
//! ```text
//! cargo test -p swordstack-integration
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use swordstack_auth::StaticCredentialStore;
use swordstack_core::{FileSpool, SpoolError, SwordConfig, TempArtifact, TempStorage};
use swordstack_http::{
    ContainerManager, MediaResourceManager, StatementManager, SwordEngine, SwordHttpService,
};
use swordstack_model::uri::CONTENT_TYPE_ORE;
use swordstack_model::{
    AcceptHeaders, AuthCredentials, Deposit, DepositReceipt, EngineError, MediaResource,
    Statement, SwordResult,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

static INIT: Once = Once::new();

/// The only identity every test server accepts.
pub const USER: &str = "sword";
/// See [`USER`].
pub const PASSWORD: &str = "sword";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// File spool that counts what passes through it.
#[derive(Debug, Default)]
pub struct CountingSpool {
    inner: FileSpool,
    stored: AtomicUsize,
    release_calls: AtomicUsize,
}

impl CountingSpool {
    /// Payloads stored so far.
    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    /// Times `release` was called.
    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TempStorage for CountingSpool {
    async fn store(&self, data: Bytes) -> Result<TempArtifact, SpoolError> {
        self.stored.fetch_add(1, Ordering::SeqCst);
        self.inner.store(data).await
    }

    async fn open(&self, artifact: &TempArtifact) -> Result<Bytes, SpoolError> {
        self.inner.open(artifact).await
    }

    fn release(&self, artifacts: &[TempArtifact]) {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.release(artifacts);
    }
}

/// Repository double that answers every call with a receipt for the
/// requested IRI and records the operations it served.
#[derive(Debug, Default)]
pub struct RecordingRepository {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<EngineError>>,
    /// Which link the receipt sets: `true` for sword-edit only, `false` for edit only.
    pub sword_edit_only: bool,
}

impl RecordingRepository {
    /// Operations served so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Make the next manager call fail with `err`.
    pub fn fail_next(&self, err: impl Into<EngineError>) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = Some(err.into());
        }
    }

    fn record(&self, call: &str) -> SwordResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_owned());
        }
        match self.failure.lock().ok().and_then(|mut f| f.take()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn receipt(&self, iri: &str) -> DepositReceipt {
        let container = iri.replace("/edit-media/", "/edit/");
        let media = container.replace("/edit/", "/edit-media/");
        let receipt = if self.sword_edit_only {
            DepositReceipt::new().with_sword_edit_iri(&container)
        } else {
            DepositReceipt::new().with_edit_iri(&container)
        };
        let mut receipt = receipt
            .with_edit_media_iri(&media)
            .with_ore_statement(format!("{container}/statement.rdf"))
            .with_treatment("stored")
            .with_last_modified(fixed_timestamp());
        receipt.add_dublin_core("title", "Integration deposit");
        receipt
    }
}

/// Timestamp used for every `Last-Modified`, so repeated requests compare equal.
fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl ContainerManager for RecordingRepository {
    async fn get_entry(
        &self,
        edit_iri: &str,
        _accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("get_entry")?;
        Ok(self.receipt(edit_iri))
    }

    async fn replace_metadata(
        &self,
        edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("replace_metadata")?;
        Ok(self.receipt(edit_iri))
    }

    async fn add_metadata(
        &self,
        edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("add_metadata")?;
        Ok(self.receipt(edit_iri))
    }

    async fn add_resources(
        &self,
        edit_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("add_resources")?;
        Ok(self.receipt(edit_iri))
    }

    async fn use_headers(
        &self,
        edit_iri: &str,
        deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record(&format!("use_headers in_progress={}", deposit.in_progress))?;
        Ok(self.receipt(edit_iri))
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
        Ok(accept
            .preferred()
            .is_some_and(|range| range.media_type == CONTENT_TYPE_ORE))
    }
}

#[async_trait]
impl MediaResourceManager for RecordingRepository {
    async fn get_media_resource_representation(
        &self,
        _em_iri: &str,
        _accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<MediaResource> {
        self.record("get_media_resource_representation")?;
        Ok(MediaResource::new(Bytes::from_static(b"PK\x03\x04 zipped"))
            .with_content_type("application/zip")
            .with_last_modified(fixed_timestamp()))
    }

    async fn replace_media_resource(
        &self,
        em_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("replace_media_resource")?;
        Ok(self.receipt(em_iri))
    }

    async fn add_resource(
        &self,
        em_iri: &str,
        _deposit: &Deposit,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<DepositReceipt> {
        self.record("add_resource")?;
        Ok(self.receipt(em_iri))
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
impl StatementManager for RecordingRepository {
    async fn get_statement(
        &self,
        _iri: &str,
        _accept: &AcceptHeaders,
        _auth: &AuthCredentials,
        _config: &SwordConfig,
    ) -> SwordResult<Statement> {
        self.record("get_statement")?;
        Ok(Statement::ore(Bytes::from_static(b"<rdf:RDF/>")).with_last_modified(fixed_timestamp()))
    }
}

/// A running in-process server.
#[derive(Debug)]
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// Repository double behind the server.
    pub repository: Arc<RecordingRepository>,
    /// Spool behind the server.
    pub spool: Arc<CountingSpool>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server with the given configuration.
    pub async fn start(config: SwordConfig) -> Result<Self> {
        Self::start_with(config, RecordingRepository::default()).await
    }

    /// Start a server with the given configuration and repository.
    pub async fn start_with(
        mut config: SwordConfig,
        repository: RecordingRepository,
    ) -> Result<Self> {
        init_tracing();
        config.gateway_listen = "127.0.0.1:0".to_owned();
        let listener = swordstack_http::bind(&config).await?;

        let repository = Arc::new(repository);
        let spool = Arc::new(CountingSpool::default());
        let engine = SwordEngine::builder()
            .config(Arc::new(config))
            .container_manager(repository.clone())
            .media_resource_manager(repository.clone())
            .statement_manager(repository.clone())
            .credential_verifier(Arc::new(StaticCredentialStore::new([(
                USER.to_owned(),
                PASSWORD.to_owned(),
            )])))
            .temp_storage(spool.clone())
            .build();

        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(swordstack_http::serve(
            listener,
            SwordHttpService::new(engine),
            async {
                rx.await.ok();
            },
        ));

        Ok(Self {
            addr,
            repository,
            spool,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}

/// A reqwest client.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Hex MD5 of `data`, computed independently of the server.
#[must_use]
pub fn md5_hex(data: &[u8]) -> String {
    use digest::Digest;
    hex::encode(md5::Md5::digest(data))
}

/// A minimal Atom entry document.
pub const ENTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" xmlns:dcterms="http://purl.org/dc/terms/">
    <title>Integration deposit</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <author><name>Tester</name></author>
    <dcterms:abstract>Deposited by the integration suite</dcterms:abstract>
</entry>"#;

mod test_auth;
mod test_container;
