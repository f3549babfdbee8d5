//! # Manifold Server
//!
//! The process entry point around the composition engine: build composes the
//! application from the registry and the selected profile, run dispatches the
//! CLI and serves HTTP with graceful shutdown.
//!
//! ## Example
//! ```no_run
//! use manifold_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder().environment("development").build()?.run().await
//! }
//! ```

use anyhow::{Context, Result};
use axum_server::Handle;
use manifold::kernel::prelude::{App, CliAction, Composer, Registry};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

/// A fluent builder for configuring and composing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    registry: Option<Registry>,
    root: Option<PathBuf>,
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    environment: Option<String>,
}

impl ServerBuilder {
    /// The registration surface. Defaults to the facade's built-in registry
    /// under the `app` namespace.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Application root: model scan base and default file locations.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Profile file path without extension.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Per-environment variable file.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Explicit environment discriminator; the process environment decides
    /// when unset.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Runs the composition sequence and returns a ready server.
    ///
    /// # Errors
    /// Any composition-stage failure aborts the build; there is no partially
    /// composed server.
    pub fn build(self) -> Result<Server> {
        let mut composer = Composer::builder()
            .registry(self.registry.unwrap_or_else(|| manifold::default_registry("app")));
        if let Some(root) = self.root {
            composer = composer.root(root);
        }
        if let Some(path) = self.config_path {
            composer = composer.config_path(path);
        }
        if let Some(path) = self.env_file {
            composer = composer.env_file(path);
        }
        if let Some(environment) = self.environment {
            composer = composer.environment(environment);
        }

        let app = composer.build().compose().context("Composition failed")?;
        Ok(Server { app })
    }
}

/// A fully composed server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    app: App,
}

impl Server {
    /// Returns a new [`ServerBuilder`].
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Parses the process CLI and acts on it: `run` serves HTTP until a
    /// shutdown signal arrives, everything else dispatches to the command
    /// surface and returns.
    ///
    /// # Errors
    /// Returns command failures, bind failures, and TLS setup failures.
    pub async fn run(self) -> Result<()> {
        let matches = self.app.surface().clap().get_matches();
        match self.app.dispatch(&matches)? {
            CliAction::Handled => Ok(()),
            CliAction::Serve => self.serve().await,
        }
    }

    /// Binds the composed application and serves until SIGINT/SIGTERM.
    ///
    /// # Errors
    /// Returns an error when the bind fails or certificates cannot be read.
    pub async fn serve(self) -> Result<()> {
        let server = &self.app.settings().server;
        let address = SocketAddr::new(server.address, server.port);
        let ssl = server.ssl.clone();

        if let Some(ssl) = &ssl {
            anyhow::ensure!(ssl.cert.exists(), "SSL certificate not found at: {}", ssl.cert.display());
            anyhow::ensure!(ssl.key.exists(), "SSL key not found at: {}", ssl.key.display());
        }

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        let service = self.app.router().into_make_service();
        if let Some(ssl) = ssl {
            info!("Starting HTTPS server on https://{address}");
            let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                .await
                .context("Failed to load SSL/TLS certificates")?;
            axum_server::bind_rustls(address, tls)
                .handle(handle)
                .serve(service)
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");
            axum_server::bind(address)
                .handle(handle)
                .serve(service)
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the composed application.
    #[must_use]
    pub const fn app(&self) -> &App {
        &self.app
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
