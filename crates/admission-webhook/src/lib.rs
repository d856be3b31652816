pub mod admission_review;
mod api;
pub mod cli;
pub mod config;
pub mod strategy;
pub mod tracing;

use anyhow::{anyhow, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::trace::TraceLayer;

use ::tracing::{error, info};

use api::state::ApiServerState;
use config::{Config, TlsConfig};
use strategy::AdmissionStrategy;

/// How long in-flight admission requests are given to complete once a
/// shutdown signal is received.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AdmissionWebhook {
    router: Router,
    addr: SocketAddr,
    tls_config: Option<TlsConfig>,
}

impl AdmissionWebhook {
    pub fn new_from_config(config: Config, strategy: Arc<dyn AdmissionStrategy>) -> Self {
        let state = Arc::new(ApiServerState {
            strategy,
            max_request_body_size: config.max_request_body_size,
        });
        let router = api::router(&config.validate_path, state).layer(TraceLayer::new_for_http());

        Self {
            router,
            addr: config.addr,
            tls_config: config.tls_config,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve requests until SIGINT or SIGTERM is received.
    pub async fn run(self) -> Result<()> {
        let handle = Handle::new();
        tokio::spawn(shutdown_on_signal(handle.clone()));

        match self.tls_config {
            None => {
                info!(address = self.addr.to_string().as_str(), "started HTTP server");
                axum_server::bind(self.addr)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            Some(tls_config) => {
                let rustls_config =
                    RustlsConfig::from_pem_file(&tls_config.cert_file, &tls_config.key_file)
                        .await
                        .map_err(|e| {
                            anyhow!(
                                "cannot load TLS certificate {} and key {}: {}",
                                tls_config.cert_file,
                                tls_config.key_file,
                                e
                            )
                        })?;
                info!(address = self.addr.to_string().as_str(), "started HTTPS server");
                axum_server::bind_rustls(self.addr, rustls_config)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }
        info!("server stopped");

        Ok(())
    }
}

async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = e.to_string().as_str(), "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = e.to_string().as_str(), "cannot listen for SIGTERM");
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

    info!("shutdown signal received, draining in-flight requests");
    handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
}
