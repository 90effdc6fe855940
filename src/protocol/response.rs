//! Response definitions
//!
//! The only structured response is the one-byte PUT acknowledgement;
//! GET and LIST replies are plain data frames with a zero-size sentinel.

/// One-byte PUT acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PutAck {
    /// Name already exists under the server root; no payload follows
    Reject = 0x00,

    /// Name is free and reserved; the client sends the data frame next
    Accept = 0x01,
}

impl PutAck {
    /// Map a wire byte back to an acknowledgement
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(PutAck::Reject),
            0x01 => Some(PutAck::Accept),
            _ => None,
        }
    }
}
