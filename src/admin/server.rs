//! Level-control listener.
//!
//! # Responsibilities
//! - Bind the control address before anything is spawned
//! - Serve the admin router on a background task
//! - Hand back a handle the owner keeps for the life of the process

use std::io;
use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::admin::{setup_admin_router, AdminState};

/// Error type for the control endpoint.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Failed to bind the listen address.
    #[error("failed to bind level-control endpoint on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The server task stopped with an I/O error.
    #[error("level-control endpoint failed: {0}")]
    Serve(#[from] io::Error),

    /// The server task panicked or was aborted.
    #[error("level-control task ended abnormally: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A bound, not yet serving, control endpoint.
pub struct AdminServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl AdminServer {
    /// Bind `addr` (e.g. `"0.0.0.0:8888"`).
    pub async fn bind(addr: &str, state: AdminState) -> Result<Self, AdminError> {
        let bind_err = |source| AdminError::Bind {
            addr: addr.to_string(),
            source,
        };

        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        tracing::info!(address = %local_addr, "Level-control endpoint bound");

        Ok(Self {
            listener,
            router: setup_admin_router(state),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start serving on a background task.
    pub fn spawn(self) -> AdminHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let local_addr = self.local_addr;

        let task = tokio::spawn(async move {
            let result = axum::serve(self.listener, self.router)
                .with_graceful_shutdown(async {
                    // Only an explicit shutdown stops the endpoint; a dropped
                    // handle leaves it serving until process exit.
                    if shutdown_rx.await.is_err() {
                        std::future::pending::<()>().await;
                    }
                })
                .await;
            if let Err(e) = &result {
                tracing::error!(address = %local_addr, error = %e, "Level-control endpoint stopped");
            }
            result
        });

        AdminHandle {
            local_addr,
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to a running control endpoint.
///
/// Dropping the handle detaches the endpoint; it keeps serving until the
/// process exits. Use [`AdminHandle::shutdown`] to stop it.
pub struct AdminHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<io::Result<()>>,
}

impl AdminHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the server task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop accepting connections and wait for the task to finish.
    pub async fn shutdown(mut self) -> Result<(), AdminError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await??;
        tracing::info!(address = %self.local_addr, "Level-control endpoint stopped");
        Ok(())
    }
}
