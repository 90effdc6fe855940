//! Error types for Sharebox
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ShareError
pub type Result<T> = std::result::Result<T, ShareError>;

/// Unified error type for Sharebox operations
#[derive(Debug, Error)]
pub enum ShareError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Command byte that maps to no known command. Kept distinguishable
    /// from other protocol errors: the session logs it and keeps the
    /// connection open instead of closing.
    #[error("Unknown command byte: 0x{0:02x}")]
    UnknownCommand(u8),

    // -------------------------------------------------------------------------
    // Discovery Errors
    // -------------------------------------------------------------------------
    #[error("Discovery error: {0}")]
    Discovery(String),

    // -------------------------------------------------------------------------
    // Client-Side User Errors
    // -------------------------------------------------------------------------
    #[error("Not connected to a server")]
    NotConnected,

    #[error("Local file not found: {0}")]
    LocalFileMissing(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShareError {
    /// Whether this error means the peer went away (clean close, reset,
    /// abort, broken pipe, or a read/write timeout). These terminate the
    /// affected session only, never the process.
    pub fn is_disconnect(&self) -> bool {
        use std::io::ErrorKind;
        match self {
            ShareError::Io(e) => matches!(
                e.kind(),
                ErrorKind::UnexpectedEof
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::WouldBlock
                    | ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}
