mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod tracing;

use ::tracing::{error, info};
use anyhow::{Result, anyhow};
use axum::Router;
use axum_server::{Handle, tls_rustls::RustlsConfig};
use lazy_static::lazy_static;
use std::{net::SocketAddr, process, sync::Arc, sync::RwLock, time::Duration};
use tracer_admission::{DecisionEngine, EngineConfig};

use crate::api::state::ApiServerState;
use crate::certs::create_tls_config_and_watch_certificate_changes;
use crate::config::Config;

lazy_static! {
    static ref TRACE_SYSTEM_INITIALIZED: RwLock<bool> = RwLock::new(false);
}

/// How long in-flight admission reviews are given to complete on shutdown
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WebhookServer {
    router: Router,
    tls_config: Option<RustlsConfig>,
    addr: SocketAddr,
}

impl WebhookServer {
    pub async fn new_from_config(config: Config) -> Result<Self> {
        if config.trusted_identity.is_empty() {
            return Err(anyhow!("the trusted identity cannot be empty"));
        }

        let engine = DecisionEngine::new(
            EngineConfig::new(config.trusted_identity).with_annotation(config.annotation),
        );
        info!(
            trusted_identity = engine.config().trusted_identity.as_str(),
            annotation_path = engine.annotation_path(),
            "decision engine ready"
        );

        let state = Arc::new(ApiServerState { engine });

        let tls_config = match config.tls_config {
            Some(tls_config) => {
                Some(create_tls_config_and_watch_certificate_changes(tls_config).await?)
            }
            None => None,
        };

        Ok(Self {
            router: api::router(state),
            tls_config,
            addr: config.addr,
        })
    }

    pub async fn run(self) -> Result<()> {
        let handle = Handle::new();
        tokio::spawn(shutdown_on_signal(handle.clone()));

        if let Some(tls_config) = self.tls_config {
            info!(address = self.addr.to_string().as_str(), "started HTTPS server");
            axum_server::bind_rustls(self.addr, tls_config)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        } else {
            info!(address = self.addr.to_string().as_str(), "started HTTP server");
            axum_server::bind(self.addr)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        }

        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down");
    handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
}

/// Mark the tracing system as ready, from now on fatal errors are
/// reported through it
pub fn tracing_initialized() {
    if let Ok(mut initialized) = TRACE_SYSTEM_INITIALIZED.write() {
        *initialized = true;
    }
}

pub fn fatal_error(msg: String) -> ! {
    let trace_system_ready = TRACE_SYSTEM_INITIALIZED
        .read()
        .map(|ready| *ready)
        .unwrap_or(false);
    if trace_system_ready {
        error!("{}", msg);
    } else {
        eprintln!("{msg}");
    }

    process::exit(1);
}
