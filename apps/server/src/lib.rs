//! # Parliament Data Library Server
//!
//! Serves the `/api/v1` JSON API and the `/api/v0` LDA compatibility layer on `Axum`,
//! reading from the Parliament triple store, the committees REST API and Elasticsearch.
//!
//! ## Example
//! ```no_run
//! use pdl_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod router;

pub use router::init as app;

use anyhow::{Context, Result, bail};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use pdl::domain::config::{ApiConfig, SslConfig};
use pdl::kernel::server::ApiState;
use pdl::kernel::upstream::Upstreams;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Collects settings for a [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Wires the upstream clients and the feature slices into an [`ApiState`].
    ///
    /// # Errors
    /// Returns an error if:
    /// * TLS is configured but the certificate or key file is missing
    /// * An upstream client rejects its settings (blank SPARQL endpoint, invalid search URL)
    /// * A feature slice fails to initialize
    pub fn build(self) -> Result<Server> {
        if let Some(ssl) = &self.cfg.server.ssl {
            check_tls_files(ssl)?;
        }

        let upstreams = Upstreams::from_config(&self.cfg).context("Failed to set up upstream clients")?;
        let slices = pdl::init(&self.cfg, &upstreams).context("Feature initialization failed")?;

        let state = ApiState::builder()
            .config(self.cfg)
            .upstreams(upstreams)
            .register_slices(slices)
            .build()
            .context("Failed to assemble API state")?;
        info!(slices = ?state.slice_names().collect::<Vec<_>>(), "Server initialized");
        Ok(Server { state })
    }
}

fn check_tls_files(ssl: &SslConfig) -> Result<()> {
    for (label, path) in [("certificate", &ssl.cert), ("key", &ssl.key)] {
        if !path.exists() {
            bail!("SSL {label} not found at: {}", path.display());
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if ssl.key.metadata()?.permissions().mode() & 0o077 != 0 {
            warn!(key = %ssl.key.display(), "SSL private key is readable by group or others");
        }
    }
    Ok(())
}

/// A fully initialized server.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Serves until Ctrl+C or SIGTERM, then drains connections for up to 30 seconds.
    ///
    /// # Errors
    /// Binding the address or loading the TLS files fails.
    pub async fn run(self) -> Result<()> {
        let server = self.state.config.server.clone();
        let address = SocketAddr::new(server.address, server.port);
        info!(
            %address,
            ssl = server.ssl.is_some(),
            api_key = self.state.config.security.active_api_key().is_some(),
            "Starting server"
        );

        let service = router::init(self.state).into_make_service();
        let handle = Handle::<SocketAddr>::new();
        tokio::spawn(drain_on_shutdown(handle.clone()));

        match &server.ssl {
            Some(ssl) => {
                let tls = RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                    .await
                    .context("Failed to load SSL/TLS certificates")?;
                info!("Listening on https://{address}");
                axum_server::bind_rustls(address, tls)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTPS server failed")?;
            },
            None => {
                info!("Listening on http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTP server failed")?;
            },
        }

        info!("Server stopped");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

async fn drain_on_shutdown(handle: Handle<SocketAddr>) {
    match shutdown_signal().await {
        Ok(()) => {
            info!(grace = ?SHUTDOWN_GRACE, "Shutdown requested, draining connections");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        },
        Err(e) => error!("Cannot listen for shutdown signals: {e:#}"),
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok(())
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}
