//! Server bootstrap: the listener, handle minting, and connection tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use nocturne_protocol::PlayerHandle;
use nocturne_room::SessionRegistry;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::NocturneError;
use crate::conn::handle_connection;

/// Counter for minting per-connection player handles. Handles are
/// never reused — a reconnect is a new identity.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// A running Nocturne game server.
///
/// One registry serves every room; each accepted socket gets its own
/// Tokio task and a fresh [`PlayerHandle`].
pub struct NocturneServer {
    listener: TcpListener,
    registry: Arc<Mutex<SessionRegistry>>,
}

impl NocturneServer {
    /// Binds the server to the given address.
    pub async fn bind(addr: &str) -> Result<Self, NocturneError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr, "nocturne listening");
        Ok(Self {
            listener,
            registry: Arc::new(Mutex::new(SessionRegistry::new())),
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), NocturneError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let handle = PlayerHandle(
                        NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
                    );
                    tracing::debug!(%handle, %addr, "connection accepted");
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        if let Err(err) =
                            handle_connection(stream, handle, registry).await
                        {
                            tracing::debug!(
                                %handle,
                                error = %err,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(err) => {
                    tracing::error!(error = %err, "accept failed");
                }
            }
        }
    }
}
