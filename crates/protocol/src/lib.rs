#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `protocol` encodes the SOCKS4a CONNECT request and decodes the fixed-size
//! reply a SOCKS4 proxy sends back. The crate performs no I/O: callers hand it
//! a destination and receive bytes to write, or hand it whatever bytes arrived
//! so far and learn whether the proxy granted the tunnel.
//!
//! # Design
//!
//! - [`ConnectRequest`] validates the destination once and renders the wire
//!   form via [`ConnectRequest::to_bytes`] or [`encode_connect_request`].
//! - [`try_decode_reply`] inspects a receive buffer and, once [`REPLY_LEN`]
//!   bytes are available, returns the parsed [`Reply`] together with the number
//!   of bytes it consumed. Anything after those bytes belongs to the tunnelled
//!   protocol and is left untouched.
//! - With the `async` feature, `Socks4aClientCodec` wraps both directions in
//!   a `tokio_util::codec` adapter.
//!
//! # Invariants
//!
//! - Requests always carry version 4, command CONNECT, the unresolved sentinel
//!   address `0.0.0.1`, and an empty user id.
//! - A destination containing a NUL byte is rejected; it would terminate the
//!   domain field early and desynchronise the proxy.
//! - Reply decoding consumes exactly [`REPLY_LEN`] bytes or none at all.
//!
//! # Errors
//!
//! [`EncodingError`] reports unusable destinations, [`ProtocolError`] reports
//! malformed replies. A well-formed refusal is not an error at this layer; it
//! is surfaced as [`ReplyStatus::Rejected`] carrying a [`Rejection`].
//!
//! # Examples
//!
//! ```
//! use protocol::{encode_connect_request, try_decode_reply, ReplyStatus};
//!
//! let request = encode_connect_request("example.onion", 80).expect("valid host");
//! assert_eq!(&request[..4], &[0x04, 0x01, 0x00, 0x50]);
//!
//! let inbound = [0x04, 0x5a, 0, 0, 0, 0, 0, 0, b'h', b'i'];
//! let (reply, consumed) = try_decode_reply(&inbound)
//!     .expect("well-formed reply")
//!     .expect("eight bytes available");
//! assert_eq!(reply.status(), ReplyStatus::Granted);
//! assert_eq!(&inbound[consumed..], b"hi");
//! ```

#[cfg(feature = "async")]
mod codec;
mod error;
mod reply;
mod request;
mod wire;

#[cfg(feature = "async")]
pub use codec::Socks4aClientCodec;
pub use error::{EncodingError, ProtocolError, Rejection};
pub use reply::{Reply, ReplyStatus, try_decode_reply};
pub use request::{ConnectRequest, encode_connect_request};
pub use wire::{
    COMMAND_CONNECT, REPLY_LEN, REQUEST_HEADER_LEN, SOCKS4_VERSION, STATUS_GRANTED,
    STATUS_IDENTD_MISMATCH, STATUS_NO_IDENTD, STATUS_REJECTED_OR_FAILED, UNRESOLVED_ADDRESS,
};
