//! Listener, accept loop and tracing setup for binaries embedding the engine.

use std::future::Future;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use swordstack_core::SwordConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::service::SwordHttpService;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`
/// (normally [`swordstack_core::SwordConfig::log_level`]).
pub fn init_tracing(log_level: &str) -> Result<(), tracing_subscriber::filter::ParseError> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Bind the listener named by [`SwordConfig::gateway_listen`].
pub async fn bind(config: &SwordConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(config.gateway_listen.as_str()).await?;
    info!(addr = %listener.local_addr()?, "listening");
    Ok(listener)
}

/// Serve connections from `listener` until `shutdown` completes, then wait
/// for in-flight requests to drain.
pub async fn serve(
    listener: TcpListener,
    service: SwordHttpService,
    shutdown: impl Future<Output = ()>,
) {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained");
}
