//! Discovery Tests
//!
//! Tests for the UDP probe-and-reply exchange.

use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::Duration;

use sharebox::config::DISCOVERY_PROBE;
use sharebox::discovery::{discover, Responder};
use sharebox::Config;

// =============================================================================
// Helper Functions
// =============================================================================

/// Start a responder on an ephemeral loopback port, serving forever
fn start_responder(service: &str) -> SocketAddr {
    let config = Config::builder()
        .discovery_addr("127.0.0.1:0")
        .service_name(service)
        .build();

    let responder = Responder::bind(&config).unwrap();
    let addr = responder.local_addr().unwrap();

    thread::spawn(move || {
        let _ = responder.serve();
    });
    addr
}

fn scan_config(target: SocketAddr, timeout_ms: u64) -> Config {
    Config::builder()
        .scan_addr(target.to_string())
        .discovery_timeout_ms(timeout_ms)
        .build()
}

// =============================================================================
// Probe / Reply Tests
// =============================================================================

#[test]
fn test_probe_yields_exact_service_string() {
    let addr = start_responder("Sharebox Test Service");

    let found = discover(&scan_config(addr, 2000)).unwrap().unwrap();
    assert_eq!(found.service, "Sharebox Test Service");
    assert_eq!(found.from.port(), addr.port());
}

#[test]
fn test_probe_embedded_in_larger_datagram_is_answered() {
    let addr = start_responder("Embedded Probe Service");

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(2000)))
        .unwrap();

    let padded = format!("xx {DISCOVERY_PROBE} xx");
    socket.send_to(padded.as_bytes(), addr).unwrap();

    let mut buf = [0u8; 1024];
    let (len, _) = socket.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], b"Embedded Probe Service");
}

#[test]
fn test_non_probe_datagram_ignored() {
    let addr = start_responder("Picky Service");

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();

    socket.send_to(b"HELLO THERE", addr).unwrap();
    let mut buf = [0u8; 1024];
    assert!(socket.recv_from(&mut buf).is_err(), "garbage got a reply");

    // The responder is still alive and answers a real probe.
    socket
        .set_read_timeout(Some(Duration::from_millis(2000)))
        .unwrap();
    socket.send_to(DISCOVERY_PROBE.as_bytes(), addr).unwrap();
    let (len, _) = socket.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], b"Picky Service");
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_no_responder_reports_none() {
    // Grab a loopback port that nothing is listening on.
    let placeholder = UdpSocket::bind("127.0.0.1:0").unwrap();
    let dead_addr = placeholder.local_addr().unwrap();
    drop(placeholder);

    let found = discover(&scan_config(dead_addr, 300)).unwrap();
    assert_eq!(found, None);
}
