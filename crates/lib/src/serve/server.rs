//! Preview server lifecycle.
//!
//! [`PreviewServer::bind`] validates the publish tree and binds the listener;
//! [`PreviewServer::run`] serves until `Ctrl-C` or `SIGTERM`. Checking the
//! tree before binding means a missing tree never leaves a port held.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::consts::{DEFAULT_HOST, DEFAULT_PORT};
use crate::serve::router::build_router;

#[derive(Debug, Clone)]
pub struct ServerConfig {
  /// Directory served as the site root.
  pub root: PathBuf,
  pub host: String,
  pub port: u16,
}

impl ServerConfig {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
  #[error("publish tree {path} does not exist")]
  PublishTreeMissing { path: PathBuf },

  #[error("failed to bind {addr}: {source}")]
  Bind {
    addr: String,
    #[source]
    source: io::Error,
  },

  #[error("server error: {0}")]
  Serve(#[source] io::Error),
}

/// A bound, not yet running, preview server.
pub struct PreviewServer {
  listener: TcpListener,
  router: Router,
  addr: SocketAddr,
  root: PathBuf,
}

impl PreviewServer {
  pub async fn bind(config: &ServerConfig) -> Result<Self, ServeError> {
    if !config.root.is_dir() {
      return Err(ServeError::PublishTreeMissing {
        path: config.root.clone(),
      });
    }

    let bind_err = |source| ServeError::Bind {
      addr: format!("{}:{}", config.host, config.port),
      source,
    };
    let listener = TcpListener::bind((config.host.as_str(), config.port))
      .await
      .map_err(bind_err)?;
    let addr = listener.local_addr().map_err(bind_err)?;

    Ok(Self {
      listener,
      router: build_router(&config.root),
      addr,
      root: config.root.clone(),
    })
  }

  pub fn local_addr(&self) -> SocketAddr {
    self.addr
  }

  /// Serve until `Ctrl-C` or `SIGTERM`.
  pub async fn run(self) -> Result<(), ServeError> {
    self.run_until(shutdown_signal()).await
  }

  /// Serve until `shutdown` resolves, letting in-flight requests finish.
  pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServeError>
  where
    F: Future<Output = ()> + Send + 'static,
  {
    info!(addr = %self.addr, root = %self.root.display(), "preview server listening");

    axum::serve(self.listener, self.router)
      .with_graceful_shutdown(shutdown)
      .await
      .map_err(ServeError::Serve)?;

    info!("preview server stopped");
    Ok(())
  }
}

/// Bind and serve `config.root` until the process is told to stop.
pub async fn serve(config: &ServerConfig) -> Result<(), ServeError> {
  PreviewServer::bind(config).await?.run().await
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      warn!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        warn!(error = %e, "failed to listen for SIGTERM");
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
}
