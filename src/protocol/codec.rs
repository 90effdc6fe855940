//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! Field widths are fixed: 1-byte command, 2-byte filename length,
//! 8-byte data size, all big-endian. The size field counts the payload
//! bytes that follow it, so after a frame is consumed the stream sits
//! exactly at the start of the next one. Readers never interpret payload
//! bytes before the full declared length has accumulated; `read_exact`
//! keeps pulling until the count is met, so partial receives of any
//! granularity reassemble correctly.

use std::io::{Read, Write};

use crate::error::{Result, ShareError};

use super::{Command, CommandType, PutAck};

/// Command field width in bytes
pub const CMD_LEN: usize = 1;

/// Filename length field width in bytes
pub const NAME_LEN_LEN: usize = 2;

/// Data size field width in bytes
pub const SIZE_LEN: usize = 8;

/// Longest filename the 2-byte length field can carry
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// Upper bound on a single data frame (1 GiB). Frames are buffered in
/// memory, so an unchecked 8-byte size field would let a peer request an
/// arbitrarily large allocation.
pub const MAX_FRAME_SIZE: u64 = 1024 * 1024 * 1024;

// =============================================================================
// Size Field Encoding/Decoding
// =============================================================================

/// Encode a payload byte count as the 8-byte big-endian size field
pub fn encode_size(n: u64) -> [u8; SIZE_LEN] {
    n.to_be_bytes()
}

/// Decode an 8-byte big-endian size field
pub fn decode_size(bytes: [u8; SIZE_LEN]) -> u64 {
    u64::from_be_bytes(bytes)
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
///
/// Format: cmd (1) + name_len (2) + name, or the bare cmd byte for LIST
pub fn encode_request(command: &Command) -> Result<Vec<u8>> {
    let cmd = command.command_type() as u8;

    match command.name() {
        Some(name) => {
            let name_bytes = name.as_bytes();
            if name_bytes.len() > MAX_NAME_LEN {
                return Err(ShareError::Protocol(format!(
                    "Filename too long: {} bytes (max {})",
                    name_bytes.len(),
                    MAX_NAME_LEN
                )));
            }

            let mut message = Vec::with_capacity(CMD_LEN + NAME_LEN_LEN + name_bytes.len());
            message.push(cmd);
            message.extend_from_slice(&(name_bytes.len() as u16).to_be_bytes());
            message.extend_from_slice(name_bytes);
            Ok(message)
        }
        None => Ok(vec![cmd]),
    }
}

/// Read a complete request from a stream
///
/// Blocks until the command byte (and filename, where the command carries
/// one) has arrived. An EOF on the command byte surfaces as an
/// `UnexpectedEof` I/O error, which the session treats as a clean
/// disconnect. A byte that maps to no command yields
/// [`ShareError::UnknownCommand`] with the stream intact and positioned
/// at the next byte.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Command> {
    let mut cmd_byte = [0u8; CMD_LEN];
    reader.read_exact(&mut cmd_byte)?;

    let cmd_type =
        CommandType::from_byte(cmd_byte[0]).ok_or(ShareError::UnknownCommand(cmd_byte[0]))?;

    match cmd_type {
        CommandType::List => Ok(Command::List),
        CommandType::Get | CommandType::Put => {
            let mut len_bytes = [0u8; NAME_LEN_LEN];
            reader.read_exact(&mut len_bytes)?;
            let name_len = u16::from_be_bytes(len_bytes) as usize;

            let mut name_bytes = vec![0u8; name_len];
            reader.read_exact(&mut name_bytes)?;

            let name = String::from_utf8(name_bytes)
                .map_err(|e| ShareError::Protocol(format!("Filename is not UTF-8: {e}")))?;

            Ok(match cmd_type {
                CommandType::Get => Command::Get { name },
                _ => Command::Put { name },
            })
        }
    }
}

// =============================================================================
// Data Frame I/O
// =============================================================================

/// Read an 8-byte size field from a stream
pub fn read_size<R: Read>(reader: &mut R) -> Result<u64> {
    let mut bytes = [0u8; SIZE_LEN];
    reader.read_exact(&mut bytes)?;
    Ok(decode_size(bytes))
}

/// Read exactly `size` payload bytes, accumulating partial receives
///
/// The declared size is validated against [`MAX_FRAME_SIZE`] before any
/// allocation happens.
pub fn read_frame_into<R: Read>(reader: &mut R, size: u64) -> Result<Vec<u8>> {
    if size > MAX_FRAME_SIZE {
        return Err(ShareError::Protocol(format!(
            "Frame too large: {size} bytes (max {MAX_FRAME_SIZE})"
        )));
    }

    let mut payload = vec![0u8; size as usize];
    if size > 0 {
        reader.read_exact(&mut payload)?;
    }
    Ok(payload)
}

/// Read a complete data frame (size field + payload) from a stream
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let size = read_size(reader)?;
    read_frame_into(reader, size)
}

/// Write a complete data frame (size field + payload) to a stream
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    writer.write_all(&encode_size(payload.len() as u64))?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// PUT Acknowledgement I/O
// =============================================================================

/// Write the one-byte PUT acknowledgement
pub fn write_ack<W: Write>(writer: &mut W, ack: PutAck) -> Result<()> {
    writer.write_all(&[ack as u8])?;
    writer.flush()?;
    Ok(())
}

/// Read the one-byte PUT acknowledgement
pub fn read_ack<R: Read>(reader: &mut R) -> Result<PutAck> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    PutAck::from_byte(byte[0])
        .ok_or_else(|| ShareError::Protocol(format!("Invalid PUT ack byte: 0x{:02x}", byte[0])))
}
