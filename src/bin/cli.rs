//! Sharebox CLI Client
//!
//! Interactive shell for talking to a Sharebox server.

use clap::Parser;
use sharebox::client::run_shell;
use sharebox::{Config, SessionClient};
use tracing_subscriber::{fmt, EnvFilter};

/// Sharebox CLI
#[derive(Parser, Debug)]
#[command(name = "sharebox-cli")]
#[command(about = "Interactive client for the Sharebox file-sharing service")]
#[command(version)]
struct Args {
    /// Directory downloads are saved into and uploads are read from
    #[arg(short, long, default_value = ".")]
    local_dir: String,

    /// Server to connect to at startup (host:port); otherwise use
    /// CONNECT or SCAN from the shell
    #[arg(short, long)]
    server: Option<String>,

    /// Address SCAN probes for a service (host:port)
    #[arg(long, default_value = "255.255.255.255:30000")]
    scan: String,

    /// Discovery reply wait in milliseconds
    #[arg(long, default_value = "2000")]
    scan_timeout_ms: u64,
}

fn main() {
    // Logs go to stderr via tracing; the shell owns stdout.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let config = Config::builder()
        .local_dir(&args.local_dir)
        .scan_addr(&args.scan)
        .discovery_timeout_ms(args.scan_timeout_ms)
        .build();

    let mut client = SessionClient::new(config);

    if let Some(server) = &args.server {
        match client.connect(server) {
            Ok(()) => println!("Connected to {server}."),
            Err(e) => println!("Error: {e}"),
        }
    }

    if let Err(e) = run_shell(&mut client) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
