#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `transport` inserts a SOCKS4a proxy hop beneath an existing
//! connection-oriented protocol. The upper layer keeps its own factory and
//! protocol; this crate runs the handshake with the proxy and then hands the
//! byte stream over as if the connection had gone directly to the
//! destination.
//!
//! # Design
//!
//! - [`traits`] declares the collaborators: [`Transport`], [`Protocol`] and
//!   [`ProtocolFactory`]. Nothing here depends on a particular event loop.
//! - [`SessionFactory`] wraps the upper-layer factory for one destination,
//!   forwards its lifecycle notifications and builds a session per attempt.
//! - [`ProxyClientSession`], [`AwaitingReply`] and [`Established`] are the
//!   handshake states. Transitions consume the previous state, and the
//!   transport moves into the upper-layer protocol at handoff.
//! - [`ProxiedConnection`] wraps the states for callers that drive
//!   connections through callbacks on a long-lived object.
//!
//! # Invariants
//!
//! - A failed attempt produces exactly one
//!   [`ProtocolFactory::on_connect_failed`] call; a granted one produces
//!   exactly one [`ProtocolFactory::build_protocol`] call and never a failure.
//! - Bytes received after the 8-byte reply in the same delivery are replayed
//!   to the upper-layer protocol exactly once, after it owns the transport.
//! - Destinations containing a NUL byte are never written to the wire.
//!
//! # Errors
//!
//! Handshake failures surface as [`ConnectError`] through the upper-layer
//! factory. Out-of-order events fed into [`ProxiedConnection`] return
//! [`SessionError`] and leave the connection untouched.
//!
//! # Examples
//!
//! ```
//! use std::io;
//! use transport::{
//!     ConnectError, Connector, Destination, PeerAddress, Protocol, ProtocolFactory,
//!     SessionFactory, Transport,
//! };
//!
//! struct Sink(Vec<u8>);
//!
//! impl Transport for Sink {
//!     fn write(&mut self, data: &[u8]) -> io::Result<()> {
//!         self.0.extend_from_slice(data);
//!         Ok(())
//!     }
//!     fn lose_connection(&mut self) {}
//! }
//!
//! struct Echo;
//!
//! impl Protocol<Sink> for Echo {
//!     fn make_connection(&mut self, _transport: Sink) {}
//!     fn data_received(&mut self, _data: &[u8]) {}
//! }
//!
//! struct Upper;
//!
//! impl ProtocolFactory<Sink> for Upper {
//!     type Protocol = Echo;
//!     fn build_protocol(&self, _peer: &PeerAddress) -> Echo {
//!         Echo
//!     }
//!     fn on_connect_failed(&self, _connector: &Connector, reason: ConnectError) {
//!         panic!("unexpected failure: {reason}");
//!     }
//! }
//!
//! let factory: SessionFactory<Sink, Upper> = SessionFactory::new("example.onion", 80, Upper);
//! let session = factory.build_session(factory.connector(Destination::new("127.0.0.1", 9050)));
//! let pending = session.connection_made(Sink(Vec::new())).pending().unwrap();
//! let established = pending.data_received(&[4, 90, 0, 0, 0, 0, 0, 0]).handed_off();
//! assert!(established.is_some());
//! ```
//!
//! # See also
//!
//! - [`protocol`] for the wire encoding of requests and replies.
//! - [`logging`] for the trace targets emitted during the handshake.

mod address;
mod connection;
mod error;
mod factory;
mod session;
#[cfg(test)]
mod test_support;
pub mod traits;

pub use address::{Connector, Destination, PeerAddress};
pub use connection::{Phase, ProxiedConnection};
pub use error::{ConnectError, SessionError};
pub use factory::SessionFactory;
pub use session::{Advance, AwaitingReply, Established, ProxyClientSession};
pub use traits::{Protocol, ProtocolFactory, Transport};
