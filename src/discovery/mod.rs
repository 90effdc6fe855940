//! Discovery Module
//!
//! UDP probe-and-reply service location.
//!
//! A client broadcasts the literal probe text to the well-known
//! discovery port; any server whose responder receives a datagram
//! containing that text replies with its service-description string.
//! The datagram boundary is the message boundary: no length prefix, no
//! retries, no sequence numbers.

mod requester;
mod responder;

pub use requester::{discover, Discovered};
pub use responder::Responder;
