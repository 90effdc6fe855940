//! Configuration for Sharebox
//!
//! Centralized configuration with sensible defaults. Built once at
//! startup and passed to constructors; immutable afterwards.

use std::path::PathBuf;

/// Main configuration for a Sharebox peer (server or client)
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Directory Configuration
    // -------------------------------------------------------------------------
    /// Directory the server shares. GET reads from it, PUT writes into
    /// it, LIST enumerates it. Created on startup if missing.
    pub root_dir: PathBuf,

    /// Directory the client saves downloaded files into.
    pub local_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (server) / default connect address (client)
    pub listen_addr: String,

    /// UDP discovery bind address (server side)
    pub discovery_addr: String,

    /// Address the client probes for discovery (unicast or broadcast)
    pub scan_addr: String,

    /// Connection read timeout (milliseconds, 0 = no timeout)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = no timeout)
    pub write_timeout_ms: u64,

    /// How long the client waits for a discovery reply (milliseconds)
    pub discovery_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Worker threads handling accepted connections
    pub workers: usize,

    /// Accepted connections that may wait for a free worker before new
    /// ones are turned away
    pub accept_queue: usize,

    // -------------------------------------------------------------------------
    // Discovery Strings
    // -------------------------------------------------------------------------
    /// Probe text a client broadcasts to locate a server
    pub probe: String,

    /// Service description the responder replies with
    pub service_name: String,
}

/// Well-known default ports, kept adjacent so they stay distinct.
pub const DEFAULT_TCP_PORT: u16 = 30001;
pub const DEFAULT_DISCOVERY_PORT: u16 = 30000;

/// Probe text of the discovery exchange. Peers must agree on it.
pub const DISCOVERY_PROBE: &str = "SERVICE DISCOVERY";

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./shared"),
            local_dir: PathBuf::from("."),
            listen_addr: format!("127.0.0.1:{DEFAULT_TCP_PORT}"),
            discovery_addr: format!("0.0.0.0:{DEFAULT_DISCOVERY_PORT}"),
            scan_addr: format!("255.255.255.255:{DEFAULT_DISCOVERY_PORT}"),
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            discovery_timeout_ms: 2_000,
            workers: 8,
            accept_queue: 64,
            probe: DISCOVERY_PROBE.to_string(),
            service_name: "Sharebox File Sharing Service".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the shared root directory (server side)
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the local download directory (client side)
    pub fn local_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.local_dir = path.into();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the UDP discovery bind address
    pub fn discovery_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.discovery_addr = addr.into();
        self
    }

    /// Set the address the client probes during SCAN
    pub fn scan_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.scan_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the discovery receive timeout (in milliseconds)
    pub fn discovery_timeout_ms(mut self, ms: u64) -> Self {
        self.config.discovery_timeout_ms = ms;
        self
    }

    /// Set the number of connection worker threads
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the accept queue depth
    pub fn accept_queue(mut self, depth: usize) -> Self {
        self.config.accept_queue = depth;
        self
    }

    /// Set the service description string the responder advertises
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
