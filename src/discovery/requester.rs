//! Discovery Requester
//!
//! Client side of the discovery exchange: one broadcast probe, one
//! bounded wait for a reply. Not finding a server is a normal outcome,
//! not an error.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;

/// Largest reply datagram the requester accepts
const RECV_SIZE: usize = 1024;

/// A service located by a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    /// Service-description string the responder advertised
    pub service: String,

    /// Address the reply came from
    pub from: SocketAddr,
}

/// Probe for a server and wait for one reply
///
/// Sends the configured probe text to `config.scan_addr` (unicast or
/// broadcast) and waits at most `config.discovery_timeout_ms` for an
/// answer. Returns `Ok(None)` when nothing replies or the socket reports
/// an error mid-exchange; only failing to set up the probe socket is an
/// `Err`.
pub fn discover(config: &Config) -> Result<Option<Discovered>> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_broadcast(true)?;

    let timeout = Duration::from_millis(config.discovery_timeout_ms.max(1));
    socket.set_read_timeout(Some(timeout))?;

    tracing::debug!("Probing {} for a file-sharing service", config.scan_addr);
    if let Err(e) = socket.send_to(config.probe.as_bytes(), &config.scan_addr) {
        tracing::debug!("Probe send failed: {}", e);
        return Ok(None);
    }

    let mut buf = [0u8; RECV_SIZE];
    match socket.recv_from(&mut buf) {
        Ok((len, from)) => {
            let service = String::from_utf8_lossy(&buf[..len]).into_owned();
            tracing::debug!("Service reply from {}: {}", from, service);
            Ok(Some(Discovered { service, from }))
        }
        Err(e) => {
            tracing::debug!("No discovery reply: {}", e);
            Ok(None)
        }
    }
}
