//! Connection Session
//!
//! Handles one accepted client connection: reads requests in a loop and
//! dispatches to the GET / PUT / LIST handlers. The session owns its
//! socket exclusively and ends when the peer closes or a fatal I/O error
//! occurs; within one session requests are processed strictly in arrival
//! order.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, ShareError};
use crate::protocol::{
    read_frame_into, read_request, read_size, write_ack, write_frame, Command, PutAck,
};
use crate::store::{render_listing, FileStore};

/// Handles a single client connection
pub struct Session {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared access to the served directory
    store: Arc<FileStore>,

    /// Peer address for logging
    peer_addr: String,
}

impl Session {
    /// Create a new session over an accepted stream
    ///
    /// Sets up buffered I/O and applies the configured socket timeouts;
    /// a timeout expiry later surfaces as a connection-fatal error.
    pub fn new(stream: TcpStream, store: Arc<FileStore>, config: &Config) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and dispatches them. Returns `Ok(())`
    /// when the client disconnects, `Err` on a fatal session error.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let command = match read_request(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(ShareError::UnknownCommand(byte)) => {
                    // Not a reason to hang up: skip the byte and await
                    // the next request.
                    tracing::warn!(
                        "Unknown command byte 0x{:02x} from {}, ignoring",
                        byte,
                        self.peer_addr
                    );
                    continue;
                }
                Err(ShareError::Protocol(msg)) => {
                    // Malformed filename. The length prefix was still
                    // honored, so the stream is aligned at the next
                    // request.
                    tracing::warn!("Bad request from {}: {}", self.peer_addr, msg);
                    continue;
                }
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Request from {}: {:?}", self.peer_addr, command);

            let outcome = match &command {
                Command::Get { name } => self.handle_get(name),
                Command::Put { name } => self.handle_put(name),
                Command::List => self.handle_list(),
            };

            if let Err(e) = outcome {
                if e.is_disconnect() {
                    tracing::debug!(
                        "Client {} went away mid-{:?}",
                        self.peer_addr,
                        command.command_type()
                    );
                    return Ok(());
                }
                tracing::warn!(
                    "Session with {} failed during {:?}: {}",
                    self.peer_addr,
                    command.command_type(),
                    e
                );
                return Err(e);
            }
        }
    }

    /// GET: reply with one size+payload frame, zero size when absent
    fn handle_get(&mut self, name: &str) -> Result<()> {
        let contents = match self.store.read(name) {
            Ok(found) => found,
            Err(e) => {
                // Filesystem trouble is signaled like a missing file;
                // the connection stays up.
                tracing::warn!("GET {:?} failed to read: {}", name, e);
                None
            }
        };

        match contents {
            Some(bytes) => {
                tracing::debug!("GET {:?} -> {} bytes to {}", name, bytes.len(), self.peer_addr);
                write_frame(&mut self.writer, &bytes)
            }
            None => {
                tracing::debug!("GET {:?} -> not found, to {}", name, self.peer_addr);
                write_frame(&mut self.writer, &[])
            }
        }
    }

    /// PUT: ack 0 and stop, or ack 1 then receive exactly one data frame
    fn handle_put(&mut self, name: &str) -> Result<()> {
        let guard = match self.store.begin_put(name) {
            Some(guard) => guard,
            None => {
                tracing::debug!("PUT {:?} rejected (exists), from {}", name, self.peer_addr);
                return write_ack(&mut self.writer, PutAck::Reject);
            }
        };

        write_ack(&mut self.writer, PutAck::Accept)?;

        // The reservation is held across the whole receive; dropping the
        // guard on any error below releases it.
        let size = read_size(&mut self.reader)?;
        let payload = read_frame_into(&mut self.reader, size)?;

        tracing::debug!(
            "PUT {:?} <- {} bytes from {}",
            guard.name(),
            payload.len(),
            self.peer_addr
        );
        guard.commit(&payload)
    }

    /// LIST: one frame of `- name` lines, zero size for an empty root
    fn handle_list(&mut self) -> Result<()> {
        let names = match self.store.list() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("LIST failed to read root: {}", e);
                Vec::new()
            }
        };

        let listing = render_listing(&names);
        tracing::debug!(
            "LIST -> {} entries ({} bytes) to {}",
            names.len(),
            listing.len(),
            self.peer_addr
        );
        write_frame(&mut self.writer, listing.as_bytes())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
