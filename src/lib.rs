#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `socks4a_hop` inserts a SOCKS4a proxy hop beneath an existing client
//! protocol. The protocol's factory keeps receiving the notifications it
//! would get from a direct connection, while the bytes actually travel
//! through a proxy that resolves the destination name itself. Hosts that
//! only the proxy can resolve, such as `.onion` names, become reachable
//! this way.
//!
//! # Crates
//!
//! - [`protocol`]: encoding of the CONNECT request and decoding of the
//!   8-byte reply.
//! - [`transport`]: the handshake state machine, the per-request
//!   [`SessionFactory`](transport::SessionFactory) and the collaborator
//!   traits.
//! - [`client`]: blocking TCP connections to the proxy, proxy configuration
//!   and [`ProxyDialer`](client::ProxyDialer).
//! - [`logging`]: trace targets and the verbosity bridge.
//!
//! # Examples
//!
//! ```
//! use socks4a_hop::protocol::{ReplyStatus, encode_connect_request, try_decode_reply};
//!
//! let request = encode_connect_request("example.onion", 80).unwrap();
//! assert_eq!(request.len(), 9 + "example.onion".len() + 1);
//!
//! let (reply, consumed) = try_decode_reply(&[4, 90, 0, 0, 0, 0, 0, 0]).unwrap().unwrap();
//! assert_eq!(reply.status(), ReplyStatus::Granted);
//! assert_eq!(consumed, 8);
//! ```

pub use client;
pub use logging;
pub use protocol;
pub use transport;

pub use client::{ClientError, ConnectOptions, ProxyConfig, ProxyDialer, Tunnel, connect_socks4a};
pub use transport::{ConnectError, Protocol, ProtocolFactory, SessionFactory, Transport};
