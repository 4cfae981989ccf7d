//! Collaborator interfaces the session is driven through.
//!
//! The byte-stream transport, the upper-layer protocol and its factory are
//! supplied by the caller. The session only ever talks to them through these
//! traits, which keeps it independent of any particular event loop.

use std::io;
use std::sync::Arc;

use crate::address::{Connector, PeerAddress};
use crate::error::ConnectError;

/// A connected, reliable, ordered byte stream.
pub trait Transport {
    /// Queues `data` for transmission.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Closes the stream after any queued data has been flushed.
    fn lose_connection(&mut self);
}

/// The application protocol that runs over the tunnel once it is open.
pub trait Protocol<T: Transport> {
    /// Hands the protocol exclusive ownership of the transport.
    fn make_connection(&mut self, transport: T);

    /// Delivers inbound bytes in the order they arrived.
    fn data_received(&mut self, data: &[u8]);

    /// Reports that the transport closed.
    fn connection_lost(&mut self, reason: &io::Error) {
        let _ = reason;
    }
}

/// Capability interface of the factory the proxy hop is inserted beneath.
///
/// Only the lifecycle notifications listed here are forwarded; from the
/// factory's point of view it is connecting directly to the destination.
pub trait ProtocolFactory<T: Transport> {
    /// Protocol instance built once the tunnel is granted.
    type Protocol: Protocol<T>;

    /// Builds the protocol for a freshly opened tunnel.
    fn build_protocol(&self, peer: &PeerAddress) -> Self::Protocol;

    /// Called once before the first connection attempt.
    fn on_start(&self) {}

    /// Called once after the last connection attempt finished.
    fn on_stop(&self) {}

    /// Called when a connection attempt begins.
    fn on_connect_attempt_started(&self, connector: &Connector) {
        let _ = connector;
    }

    /// Called at most once per attempt when it fails before the tunnel opened.
    fn on_connect_failed(&self, connector: &Connector, reason: ConnectError);

    /// Called when an established tunnel closes.
    fn on_connection_lost(&self, connector: &Connector, reason: &io::Error) {
        let _ = (connector, reason);
    }
}

impl<T, F> ProtocolFactory<T> for Arc<F>
where
    T: Transport,
    F: ProtocolFactory<T> + ?Sized,
{
    type Protocol = F::Protocol;

    fn build_protocol(&self, peer: &PeerAddress) -> Self::Protocol {
        (**self).build_protocol(peer)
    }

    fn on_start(&self) {
        (**self).on_start();
    }

    fn on_stop(&self) {
        (**self).on_stop();
    }

    fn on_connect_attempt_started(&self, connector: &Connector) {
        (**self).on_connect_attempt_started(connector);
    }

    fn on_connect_failed(&self, connector: &Connector, reason: ConnectError) {
        (**self).on_connect_failed(connector, reason);
    }

    fn on_connection_lost(&self, connector: &Connector, reason: &io::Error) {
        (**self).on_connection_lost(connector, reason);
    }
}
