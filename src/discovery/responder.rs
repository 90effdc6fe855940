//! Discovery Responder
//!
//! Server side of the discovery exchange. Runs on its own thread,
//! independent of the TCP accept loop, and serves probes forever.

use std::net::{SocketAddr, UdpSocket};

use crate::config::Config;
use crate::error::Result;

/// Largest datagram the responder looks at
const RECV_SIZE: usize = 1024;

/// Answers discovery probes with the configured service string
pub struct Responder {
    socket: UdpSocket,
    probe: String,
    service_name: String,
}

impl Responder {
    /// Bind the discovery socket
    pub fn bind(config: &Config) -> Result<Self> {
        let socket = UdpSocket::bind(&config.discovery_addr)?;
        tracing::info!("Discovery responder listening on {}", socket.local_addr()?);

        Ok(Self {
            socket,
            probe: config.probe.clone(),
            service_name: config.service_name.clone(),
        })
    }

    /// The bound address (useful when the port was 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Serve probes forever
    ///
    /// Datagrams that do not contain the probe text are ignored, and so
    /// are transient socket errors; only process shutdown stops the loop.
    pub fn serve(&self) -> Result<()> {
        let mut buf = [0u8; RECV_SIZE];

        loop {
            let (len, sender) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) => {
                    tracing::warn!("Discovery receive failed: {}", e);
                    continue;
                }
            };

            let datagram = String::from_utf8_lossy(&buf[..len]);
            if !datagram.contains(&self.probe) {
                tracing::debug!("Ignoring non-probe datagram from {}", sender);
                continue;
            }

            tracing::debug!("Probe from {}, advertising service", sender);
            if let Err(e) = self.socket.send_to(self.service_name.as_bytes(), sender) {
                tracing::warn!("Discovery reply to {} failed: {}", sender, e);
            }
        }
    }
}
