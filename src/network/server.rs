//! TCP Server
//!
//! Accepts connections and dispatches them to a fixed worker pool. The
//! discovery responder runs alongside on its own thread so probes are
//! answered independently of the accept loop.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, TrySendError};

use crate::config::Config;
use crate::discovery::Responder;
use crate::error::Result;
use crate::network::Session;
use crate::store::FileStore;

/// How long the accept loop naps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Signals the accept loop to stop
///
/// Cheap to clone; handed to Ctrl+C handlers and tests.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Request shutdown; the accept loop notices within one poll interval
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// TCP file-sharing server
pub struct Server {
    config: Config,
    store: Arc<FileStore>,
    listener: TcpListener,
    responder: Option<Responder>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the TCP listener and the discovery socket
    ///
    /// The root directory is created if it does not exist. Nothing is
    /// served until [`Server::run`].
    pub fn bind(config: Config) -> Result<Self> {
        let store = Arc::new(FileStore::open(&config.root_dir)?);
        let listener = TcpListener::bind(&config.listen_addr)?;
        let responder = Responder::bind(&config)?;

        tracing::info!(
            "Serving {} on {}",
            store.root().display(),
            listener.local_addr()?
        );

        Ok(Self {
            config,
            store,
            listener,
            responder: Some(responder),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The bound TCP address (useful when the port was 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// The bound UDP discovery address
    pub fn discovery_addr(&self) -> Result<SocketAddr> {
        match &self.responder {
            Some(responder) => responder.local_addr(),
            None => Err(crate::error::ShareError::Discovery(
                "Responder already running".to_string(),
            )),
        }
    }

    /// Get a handle that can stop the accept loop
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown))
    }

    /// Run the server (blocking)
    ///
    /// Spawns the discovery responder and the worker pool, then accepts
    /// connections until the shutdown flag is set. Accepted streams go
    /// through a bounded queue; when every worker is busy and the queue
    /// is full, new connections are dropped with a warning instead of
    /// piling up.
    pub fn run(mut self) -> Result<()> {
        // Discovery runs until process exit; it holds no shared state.
        if let Some(responder) = self.responder.take() {
            thread::Builder::new()
                .name("discovery".to_string())
                .spawn(move || {
                    if let Err(e) = responder.serve() {
                        tracing::error!("Discovery responder stopped: {}", e);
                    }
                })?;
        }

        let (conn_tx, conn_rx) = channel::bounded::<TcpStream>(self.config.accept_queue);

        let mut workers = Vec::with_capacity(self.config.workers);
        for id in 0..self.config.workers.max(1) {
            let rx = conn_rx.clone();
            let store = Arc::clone(&self.store);
            let config = self.config.clone();

            let handle = thread::Builder::new()
                .name(format!("session-worker-{id}"))
                .spawn(move || {
                    // Exits when the channel closes at shutdown.
                    for stream in rx.iter() {
                        serve_connection(stream, &store, &config);
                    }
                })?;
            workers.push(handle);
        }
        drop(conn_rx);

        // Non-blocking accept so the shutdown flag gets checked even
        // when no clients show up.
        self.listener.set_nonblocking(true)?;

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    // Accepted sockets inherit the listener's
                    // non-blocking flag on some platforms.
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Failed to configure socket for {}: {}", addr, e);
                        continue;
                    }

                    match conn_tx.try_send(stream) {
                        Ok(()) => tracing::debug!("Queued connection from {}", addr),
                        Err(TrySendError::Full(stream)) => {
                            tracing::warn!("Connection queue full, turning away {}", addr);
                            drop(stream);
                        }
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, draining workers");
        drop(conn_tx);
        for handle in workers {
            let _ = handle.join();
        }

        Ok(())
    }
}

/// Run one session to completion, logging its outcome
fn serve_connection(stream: TcpStream, store: &Arc<FileStore>, config: &Config) {
    let mut session = match Session::new(stream, Arc::clone(store), config) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Failed to set up session: {}", e);
            return;
        }
    };

    if let Err(e) = session.handle() {
        tracing::warn!("Session with {} ended with error: {}", session.peer_addr(), e);
    }
}
