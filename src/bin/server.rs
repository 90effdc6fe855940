//! Sharebox Server Binary
//!
//! Serves a directory over TCP and answers UDP discovery probes.

use clap::Parser;
use sharebox::network::Server;
use sharebox::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// Sharebox Server
#[derive(Parser, Debug)]
#[command(name = "sharebox-server")]
#[command(about = "Minimal LAN file-sharing server")]
#[command(version)]
struct Args {
    /// Directory to share
    #[arg(short, long, default_value = "./shared")]
    root: String,

    /// TCP listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:30001")]
    listen: String,

    /// UDP discovery bind address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:30000")]
    discovery: String,

    /// Service description advertised to discovery probes
    #[arg(long, default_value = "Sharebox File Sharing Service")]
    service_name: String,

    /// Connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Socket read/write timeout in milliseconds (0 disables)
    #[arg(short, long, default_value = "30000")]
    timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sharebox=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Sharebox Server v{}", sharebox::VERSION);
    tracing::info!("Shared directory: {}", args.root);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .root_dir(&args.root)
        .listen_addr(&args.listen)
        .discovery_addr(&args.discovery)
        .service_name(&args.service_name)
        .workers(args.workers)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl+C terminates the process; sessions are independent and the
    // store never leaves a half-written file visible, so there is no
    // state to flush. Embedders wanting a graceful stop can use
    // Server::shutdown_handle before run().
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
