//! SOCKS4a handshake state machine for a single proxy connection.
//!
//! Each state is its own type and every transition consumes the previous
//! state, so a session can never be driven from a state it already left.
//! The states mirror the connection's lifecycle:
//!
//! - [`ProxyClientSession`]: the transport to the proxy is not open yet.
//! - [`AwaitingReply`]: the CONNECT request was sent; reply bytes are buffered
//!   until the 8-byte reply is complete.
//! - [`Established`]: the proxy granted the request and the transport now
//!   belongs to the upper-layer protocol.
//!
//! A failed attempt is reported to the upper-layer factory exactly once, at
//! the transition that produced [`Advance::Failed`].

use std::fmt;
use std::io;
use std::marker::PhantomData;

use logging::{trace_handoff, trace_proto};
use protocol::{ConnectRequest, REPLY_LEN, ReplyStatus, try_decode_reply};

use crate::address::{Connector, PeerAddress};
use crate::error::ConnectError;
use crate::factory::SessionFactory;
use crate::traits::{Protocol, ProtocolFactory, Transport};


/// Result of feeding an event into a session.
pub enum Advance<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    /// Still waiting for the rest of the proxy's reply.
    Pending(AwaitingReply<T, F>),
    /// The tunnel is open and the upper-layer protocol owns the transport.
    HandedOff(Established<T, F>),
    /// The attempt failed and the failure has already been reported.
    Failed,
}

impl<T, F> Advance<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    /// Reports whether the attempt failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns the established tunnel, if the handoff happened.
    #[must_use]
    pub fn handed_off(self) -> Option<Established<T, F>> {
        match self {
            Self::HandedOff(established) => Some(established),
            _ => None,
        }
    }

    /// Returns the pending session, if more reply bytes are needed.
    #[must_use]
    pub fn pending(self) -> Option<AwaitingReply<T, F>> {
        match self {
            Self::Pending(session) => Some(session),
            _ => None,
        }
    }
}

impl<T, F> fmt::Debug for Advance<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(session) => f.debug_tuple("Pending").field(session).finish(),
            Self::HandedOff(established) => f.debug_tuple("HandedOff").field(established).finish(),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// A session whose transport to the proxy has not opened yet.
pub struct ProxyClientSession<T, F> {
    factory: SessionFactory<T, F>,
    connector: Connector,
    _transport: PhantomData<fn(T)>,
}

impl<T, F> ProxyClientSession<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    pub(crate) const fn new(factory: SessionFactory<T, F>, connector: Connector) -> Self {
        Self {
            factory,
            connector,
            _transport: PhantomData,
        }
    }

    /// Returns the attempt this session belongs to.
    #[must_use]
    pub const fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Sends the CONNECT request over the freshly opened `transport`.
    ///
    /// Hosts containing a NUL byte are refused before anything is written;
    /// the transport is closed and the attempt reported as failed.
    pub fn connection_made(self, mut transport: T) -> Advance<T, F> {
        let destination = self.connector.destination();
        let request = match ConnectRequest::new(destination.host(), destination.port()) {
            Ok(request) => request,
            Err(error) => {
                transport.lose_connection();
                return self.fail(error.into());
            }
        };

        let bytes = request.to_bytes();
        if let Err(error) = transport.write(&bytes) {
            transport.lose_connection();
            return self.fail(error.into());
        }
        trace_proto!(
            "sent {} byte CONNECT request for {}",
            bytes.len(),
            destination
        );

        Advance::Pending(AwaitingReply {
            factory: self.factory,
            connector: self.connector,
            transport,
            buffer: Vec::with_capacity(REPLY_LEN),
        })
    }

    /// Reports that the transport to the proxy could not be opened.
    pub fn connection_failed(self, reason: io::Error) -> Advance<T, F> {
        self.fail(reason.into())
    }

    fn fail(self, reason: ConnectError) -> Advance<T, F> {
        self.factory.client_connection_failed(&self.connector, reason);
        Advance::Failed
    }
}

impl<T, F> fmt::Debug for ProxyClientSession<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyClientSession")
            .field("connector", &self.connector)
            .finish_non_exhaustive()
    }
}

/// A session that sent its request and is collecting the proxy's reply.
pub struct AwaitingReply<T, F> {
    factory: SessionFactory<T, F>,
    connector: Connector,
    transport: T,
    buffer: Vec<u8>,
}

impl<T, F> AwaitingReply<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    /// Returns the attempt this session belongs to.
    #[must_use]
    pub const fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Returns the reply bytes buffered so far.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Buffers `data` and acts on the reply once all of it has arrived.
    ///
    /// On a grant the upper-layer protocol is built, handed the transport,
    /// and then receives any bytes that followed the reply in the same
    /// delivery. Rejections and malformed replies close the transport and
    /// report the failure.
    pub fn data_received(mut self, data: &[u8]) -> Advance<T, F> {
        self.buffer.extend_from_slice(data);

        let (reply, consumed) = match try_decode_reply(&self.buffer) {
            Ok(Some(decoded)) => decoded,
            Ok(None) => return Advance::Pending(self),
            Err(error) => {
                trace_proto!("malformed reply from {}: {error}", self.connector.proxy());
                return self.fail(error.into());
            }
        };

        match reply.status() {
            ReplyStatus::Granted => self.hand_off(consumed),
            ReplyStatus::Rejected(rejection) => {
                trace_proto!(
                    "proxy {} rejected request with status {}",
                    self.connector.proxy(),
                    rejection.status()
                );
                self.fail(rejection.into())
            }
        }
    }

    /// Reports that the proxy closed the connection before replying in full.
    pub fn connection_lost(self, reason: io::Error) -> Advance<T, F> {
        self.factory.client_connection_lost(&self.connector, reason);
        Advance::Failed
    }

    fn fail(mut self, reason: ConnectError) -> Advance<T, F> {
        self.transport.lose_connection();
        self.factory.client_connection_failed(&self.connector, reason);
        Advance::Failed
    }

    fn hand_off(mut self, consumed: usize) -> Advance<T, F> {
        let leftover = self.buffer.split_off(consumed);
        let peer = PeerAddress::Unresolved(self.connector.destination().clone());

        let mut protocol = self.factory.upper().build_protocol(&peer);
        protocol.make_connection(self.transport);
        trace_handoff!(
            "tunnel to {} open, replaying {} buffered bytes",
            self.connector,
            leftover.len()
        );
        if !leftover.is_empty() {
            protocol.data_received(&leftover);
        }

        Advance::HandedOff(Established {
            protocol,
            factory: self.factory,
            connector: self.connector,
        })
    }
}

impl<T, F> fmt::Debug for AwaitingReply<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwaitingReply")
            .field("connector", &self.connector)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

/// An open tunnel whose transport belongs to the upper-layer protocol.
///
/// Inbound bytes pass straight through to the protocol; the session no
/// longer inspects them.
pub struct Established<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    protocol: F::Protocol,
    factory: SessionFactory<T, F>,
    connector: Connector,
}

impl<T, F> Established<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    /// Returns the attempt this tunnel belongs to.
    #[must_use]
    pub const fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Returns the upper-layer protocol.
    #[must_use]
    pub const fn protocol(&self) -> &F::Protocol {
        &self.protocol
    }

    /// Returns the upper-layer protocol mutably.
    pub fn protocol_mut(&mut self) -> &mut F::Protocol {
        &mut self.protocol
    }

    /// Unwraps the upper-layer protocol.
    pub fn into_protocol(self) -> F::Protocol {
        self.protocol
    }

    /// Forwards inbound bytes to the protocol.
    pub fn data_received(&mut self, data: &[u8]) {
        self.protocol.data_received(data);
    }

    /// Reports that the tunnel closed and returns the protocol.
    ///
    /// The upper-layer factory sees a lost connection here, never a failed
    /// attempt.
    pub fn connection_lost(mut self, reason: &io::Error) -> F::Protocol {
        trace_handoff!("tunnel {} closed: {reason}", self.connector);
        self.protocol.connection_lost(reason);
        self.factory
            .upper()
            .on_connection_lost(&self.connector, reason);
        self.protocol
    }
}

impl<T, F> fmt::Debug for Established<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Established")
            .field("connector", &self.connector)
            .finish_non_exhaustive()
    }
}
