//! Interactive Shell
//!
//! Thin line-command wrapper around [`SessionClient`]. No protocol
//! semantics live here: each verb maps onto one client call, and every
//! failure is reported to the operator while the loop keeps running.

use std::io::{self, BufRead, Write};

use crate::error::Result;

use super::{GetOutcome, ListOutcome, PutOutcome, SessionClient};

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Probe for a server via UDP discovery
    Scan,

    /// Open a TCP connection
    Connect { host: String, port: u16 },

    /// Download a file
    Get { name: String },

    /// Upload a file
    Put { name: String },

    /// List the server's directory
    RemoteList,

    /// List the local directory
    LocalList,

    /// Close the connection
    Bye,

    /// Show the command set
    Help,

    /// Leave the shell
    Quit,
}

/// Parse one input line
///
/// The verb is case-insensitive and surrounding whitespace is ignored.
/// Errors are operator-facing messages.
pub fn parse_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let verb = match words.next() {
        Some(verb) => verb.to_ascii_uppercase(),
        None => return Err("Empty command".to_string()),
    };

    let command = match verb.as_str() {
        "SCAN" => ShellCommand::Scan,
        "CONNECT" => {
            let host = words
                .next()
                .ok_or("Usage: CONNECT <ip> <port>")?
                .to_string();
            let port = words
                .next()
                .ok_or("Usage: CONNECT <ip> <port>")?
                .parse::<u16>()
                .map_err(|_| "Port must be a number between 0 and 65535".to_string())?;
            ShellCommand::Connect { host, port }
        }
        "GET" => ShellCommand::Get {
            name: words.next().ok_or("Usage: GET <file>")?.to_string(),
        },
        "PUT" => ShellCommand::Put {
            name: words.next().ok_or("Usage: PUT <file>")?.to_string(),
        },
        "RLIST" => ShellCommand::RemoteList,
        "LLIST" => ShellCommand::LocalList,
        "BYE" => ShellCommand::Bye,
        "HELP" => ShellCommand::Help,
        "QUIT" | "EXIT" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {other} (try HELP)")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("Unexpected argument: {extra}"));
    }
    Ok(command)
}

const HELP_TEXT: &str = "\
Commands:
  SCAN                  probe for a file-sharing service
  CONNECT <ip> <port>   connect to a server
  GET <file>            download a file into the local directory
  PUT <file>            upload a local file
  RLIST                 list files on the server
  LLIST                 list files in the local directory
  BYE                   close the connection
  QUIT                  leave";

/// Run the interactive loop over stdin until QUIT or end of input
pub fn run_shell(client: &mut SessionClient) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Command: ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        if matches!(command, ShellCommand::Quit) {
            client.disconnect();
            break;
        }
        dispatch(client, command);
    }

    Ok(())
}

/// Execute one command, reporting the outcome to the operator
fn dispatch(client: &mut SessionClient, command: ShellCommand) {
    match command {
        ShellCommand::Scan => match client.scan() {
            Ok(Some(found)) => println!("{} at {}", found.service, found.from),
            Ok(None) => println!("No service found."),
            Err(e) => println!("Error: {e}"),
        },
        ShellCommand::Connect { host, port } => {
            match client.connect(&format!("{host}:{port}")) {
                Ok(()) => println!("Connected to {host}:{port}."),
                Err(e) => println!("Error: {e}"),
            }
        }
        ShellCommand::Get { name } => match client.get(&name) {
            Ok(GetOutcome::Saved { path, bytes }) => {
                println!("Received {} bytes. Created file: {}", bytes, path.display());
            }
            Ok(GetOutcome::NotFound) => println!("File not found on server."),
            Err(e) => println!("Error: {e}"),
        },
        ShellCommand::Put { name } => match client.put(&name) {
            Ok(PutOutcome::Stored { bytes }) => println!("Sent {bytes} bytes."),
            Ok(PutOutcome::AlreadyExists) => println!("File already exists on server."),
            Err(e) => println!("Error: {e}"),
        },
        ShellCommand::RemoteList => match client.list() {
            Ok(ListOutcome::Listing(text)) => println!("{text}"),
            Ok(ListOutcome::Empty) => println!("No files found."),
            Err(e) => println!("Error: {e}"),
        },
        ShellCommand::LocalList => match client.local_list() {
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
            }
            Err(e) => println!("Error: {e}"),
        },
        ShellCommand::Bye => {
            if !client.disconnect() {
                println!("Not connected.");
            }
        }
        ShellCommand::Help => println!("{HELP_TEXT}"),
        ShellCommand::Quit => unreachable!("handled by the loop"),
    }
}
