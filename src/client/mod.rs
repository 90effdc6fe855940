//! Client Module
//!
//! The session client holds at most one outbound connection and issues
//! one blocking protocol round trip per command. Outcomes the operator
//! cares about (file not found, name taken, empty listing) are values,
//! not errors; errors are reserved for user mistakes and I/O failures.

mod shell;

pub use shell::{parse_line, run_shell, ShellCommand};

use std::fs;
use std::io::Write;
use std::net::TcpStream;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::discovery::{self, Discovered};
use crate::error::{Result, ShareError};
use crate::protocol::{
    encode_request, read_ack, read_frame_into, read_size, write_frame, Command, PutAck,
};
use crate::store::FileStore;

/// Result of a GET round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    /// File received and persisted under the local root
    Saved { path: PathBuf, bytes: usize },

    /// Server replied with the zero-size sentinel
    NotFound,
}

/// Result of a PUT round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// Server accepted and the payload was sent
    Stored { bytes: usize },

    /// Server rejected: the name already exists there
    AlreadyExists,
}

/// Result of a LIST round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// Rendered listing text from the server
    Listing(String),

    /// Server replied with the zero-size sentinel
    Empty,
}

/// Client side of one file-sharing session
pub struct SessionClient {
    config: Config,
    stream: Option<TcpStream>,
}

impl SessionClient {
    /// Create an unconnected client
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// The client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe for a server via UDP discovery
    pub fn scan(&self) -> Result<Option<Discovered>> {
        discovery::discover(&self.config)
    }

    /// Open a connection to `addr` ("host:port")
    ///
    /// An existing connection is closed first. Failure leaves the client
    /// unconnected and is reported to the caller, never fatal to the
    /// process.
    pub fn connect(&mut self, addr: &str) -> Result<()> {
        self.stream = None;

        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        if self.config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(self.config.read_timeout_ms)))?;
        }
        if self.config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(self.config.write_timeout_ms)))?;
        }

        tracing::debug!("Connected to {}", addr);
        self.stream = Some(stream);
        Ok(())
    }

    /// Close the connection
    ///
    /// Returns `false` when there was nothing to close; calling this
    /// while disconnected is a reported no-op, not an error.
    pub fn disconnect(&mut self) -> bool {
        match self.stream.take() {
            Some(_) => {
                tracing::debug!("Disconnected");
                true
            }
            None => false,
        }
    }

    /// Download `name` from the server into the local root
    pub fn get(&mut self, name: &str) -> Result<GetOutcome> {
        let result = self.get_inner(name);
        self.poison_on_fatal(result)
    }

    /// Upload the local file `name` to the server
    pub fn put(&mut self, name: &str) -> Result<PutOutcome> {
        let result = self.put_inner(name);
        self.poison_on_fatal(result)
    }

    /// Fetch the server's directory listing
    pub fn list(&mut self) -> Result<ListOutcome> {
        let result = self.list_inner();
        self.poison_on_fatal(result)
    }

    /// Enumerate the local root (the shell's LLIST)
    pub fn local_list(&self) -> Result<Vec<String>> {
        FileStore::open(&self.config.local_dir)?.list()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn stream(&mut self) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or(ShareError::NotConnected)
    }

    /// Drop the connection after an error that leaves the stream in an
    /// unknown position; the next frame boundary is unrecoverable, so
    /// keeping the socket would desynchronize every later command.
    fn poison_on_fatal<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ShareError::Io(_) | ShareError::Protocol(_)) = &result {
            if self.stream.take().is_some() {
                tracing::debug!("Connection dropped after session error");
            }
        }
        result
    }

    fn get_inner(&mut self, name: &str) -> Result<GetOutcome> {
        let request = encode_request(&Command::Get {
            name: name.to_string(),
        })?;

        let stream = self.stream()?;
        stream.write_all(&request)?;

        let size = read_size(stream)?;
        if size == 0 {
            return Ok(GetOutcome::NotFound);
        }

        let payload = read_frame_into(stream, size)?;

        let path = self.config.local_dir.join(name);
        fs::create_dir_all(&self.config.local_dir)?;
        fs::write(&path, &payload)?;

        Ok(GetOutcome::Saved {
            path,
            bytes: payload.len(),
        })
    }

    fn put_inner(&mut self, name: &str) -> Result<PutOutcome> {
        let local_path = self.config.local_dir.join(name);
        let payload = match fs::read(&local_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShareError::LocalFileMissing(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let request = encode_request(&Command::Put {
            name: name.to_string(),
        })?;

        let stream = self.stream()?;
        stream.write_all(&request)?;

        match read_ack(stream)? {
            PutAck::Reject => Ok(PutOutcome::AlreadyExists),
            PutAck::Accept => {
                write_frame(stream, &payload)?;
                Ok(PutOutcome::Stored {
                    bytes: payload.len(),
                })
            }
        }
    }

    fn list_inner(&mut self) -> Result<ListOutcome> {
        let request = encode_request(&Command::List)?;

        let stream = self.stream()?;
        stream.write_all(&request)?;

        let size = read_size(stream)?;
        if size == 0 {
            return Ok(ListOutcome::Empty);
        }

        let payload = read_frame_into(stream, size)?;
        let text = String::from_utf8(payload)
            .map_err(|e| ShareError::Protocol(format!("Listing is not UTF-8: {e}")))?;

        Ok(ListOutcome::Listing(text))
    }
}
