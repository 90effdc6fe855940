//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (Simple Binary, big-endian, no magic, no version)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬─────────────┬──────────────────────────┐
//! │ Cmd (1)  │ NameLen (2) │   Filename (UTF-8)       │
//! └──────────┴─────────────┴──────────────────────────┘
//! ```
//! LIST carries no filename: the request is the bare command byte.
//!
//! ### Commands
//! - 0x01: GET   - download a file from the server root
//! - 0x02: PUT   - upload a file into the server root
//! - 0x03: LIST  - enumerate the server root
//!
//! ### Data Frame Format (GET reply, PUT payload, LIST reply)
//! ```text
//! ┌────────────────┬──────────────────────────────────┐
//! │   Size (8)     │          Payload                 │
//! └────────────────┴──────────────────────────────────┘
//! ```
//! A zero size field is a sentinel: "not found" on GET, "no files" on
//! LIST. The PUT acknowledgement is a single byte sent before any data
//! frame: 0 = reject (name exists), 1 = accept.

mod codec;
mod command;
mod response;

pub use codec::{
    decode_size, encode_request, encode_size, read_ack, read_frame, read_frame_into,
    read_request, read_size, write_ack, write_frame, CMD_LEN, MAX_FRAME_SIZE, MAX_NAME_LEN,
    NAME_LEN_LEN, SIZE_LEN,
};
pub use command::{Command, CommandType};
pub use response::PutAck;
