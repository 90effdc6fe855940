//! # Sharebox
//!
//! A minimal LAN file-sharing service:
//! - A server exposes one flat directory over TCP
//! - Clients locate servers via UDP broadcast discovery
//! - GET / PUT / LIST exchanged as small length-prefixed messages
//!
//! ## Architecture Overview
//!
//! ```text
//!            UDP probe                      TCP
//!  ┌────────┐ ───────▶ ┌───────────┐   ┌──────────────┐
//!  │ Client │          │ Responder │   │ Accept Loop  │
//!  │ (shell)│ ◀─────── └───────────┘   └──────┬───────┘
//!  └───┬────┘  service                        │ bounded queue
//!      │                              ┌───────▼────────┐
//!      │ GET / PUT / LIST             │  Worker Pool   │
//!      └─────────────────────────────▶│ (one Session   │
//!                                     │ per connection)│
//!                                     └───────┬────────┘
//!                                     ┌───────▼────────┐
//!                                     │   FileStore    │
//!                                     │ (root directory│
//!                                     │ + PUT arbiter) │
//!                                     └────────────────┘
//! ```
//!
//! Each session owns its socket exclusively; sessions share nothing but
//! the [`store::FileStore`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod client;
pub mod discovery;
pub mod network;
pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::SessionClient;
pub use config::Config;
pub use error::{Result, ShareError};
pub use network::Server;
pub use store::FileStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Sharebox
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
