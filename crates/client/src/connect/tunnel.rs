use std::fmt;
use std::io::{self, Read};
use std::net::TcpStream;
use std::sync::{Mutex, PoisonError};

use logging::trace_connect;
use transport::{
    ConnectError, Connector, PeerAddress, ProtocolFactory, ProxiedConnection, SessionError,
    SessionFactory,
};

use crate::error::{ClientError, FailureSummary};
use crate::tcp::TcpTransport;

pub(crate) const READ_CHUNK: usize = 16 * 1024;

/// Wraps the caller's factory and keeps a copy of the failure it is sent.
#[derive(Debug)]
pub(crate) struct Observed<F> {
    upper: F,
    failure: Mutex<Option<FailureSummary>>,
}

impl<F> Observed<F> {
    pub(crate) const fn new(upper: F) -> Self {
        Self {
            upper,
            failure: Mutex::new(None),
        }
    }

    pub(crate) const fn upper(&self) -> &F {
        &self.upper
    }

    pub(crate) fn take_failure(&self) -> Option<FailureSummary> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<F> ProtocolFactory<TcpTransport> for Observed<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    type Protocol = F::Protocol;

    fn build_protocol(&self, peer: &PeerAddress) -> Self::Protocol {
        self.upper.build_protocol(peer)
    }

    fn on_start(&self) {
        self.upper.on_start();
    }

    fn on_stop(&self) {
        self.upper.on_stop();
    }

    fn on_connect_attempt_started(&self, connector: &Connector) {
        self.upper.on_connect_attempt_started(connector);
    }

    fn on_connect_failed(&self, connector: &Connector, reason: ConnectError) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(FailureSummary::from(&reason));
        self.upper.on_connect_failed(connector, reason);
    }

    fn on_connection_lost(&self, connector: &Connector, reason: &io::Error) {
        self.upper.on_connection_lost(connector, reason);
    }
}

pub(crate) type ObservedFactory<F> = SessionFactory<TcpTransport, Observed<F>>;

/// Stops the wrapped factory when the request is over, whichever way it ends.
pub(crate) struct StopGuard<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    factory: ObservedFactory<F>,
}

impl<F> StopGuard<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    pub(crate) fn start(factory: ObservedFactory<F>) -> Self {
        factory.start();
        Self { factory }
    }

    pub(crate) fn failure(&self, connector: Connector) -> ClientError {
        let summary = self.factory.upper().take_failure().unwrap_or_else(|| {
            FailureSummary::from(&ConnectError::Transport(io::Error::other(
                "connection attempt ended without a result",
            )))
        });
        ClientError::failed(connector, summary)
    }
}

impl<F> Drop for StopGuard<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    fn drop(&mut self) {
        self.factory.stop();
    }
}

/// An open tunnel through the proxy.
///
/// The upper-layer protocol already owns the writing side of the socket.
/// The tunnel keeps a clone for reading and feeds what arrives to the
/// protocol. The wrapped factory is stopped when the tunnel is dropped or
/// [`run`](Self::run) returns.
pub struct Tunnel<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    reader: TcpStream,
    connection: ProxiedConnection<TcpTransport, Observed<F>>,
    connector: Connector,
    guard: StopGuard<F>,
}

impl<F> Tunnel<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    pub(crate) const fn new(
        reader: TcpStream,
        connection: ProxiedConnection<TcpTransport, Observed<F>>,
        connector: Connector,
        guard: StopGuard<F>,
    ) -> Self {
        Self {
            reader,
            connection,
            connector,
            guard,
        }
    }

    /// Returns the attempt that opened this tunnel.
    #[must_use]
    pub const fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Returns the factory the tunnel was opened for.
    #[must_use]
    pub fn factory(&self) -> &F {
        self.guard.factory.upper().upper()
    }

    /// Returns the reading half of the socket.
    #[must_use]
    pub const fn stream(&self) -> &TcpStream {
        &self.reader
    }

    /// Returns the upper-layer protocol.
    #[must_use]
    pub fn protocol(&self) -> Option<&F::Protocol> {
        self.connection.protocol()
    }

    /// Returns the upper-layer protocol mutably.
    pub fn protocol_mut(&mut self) -> Option<&mut F::Protocol> {
        self.connection.protocol_mut()
    }

    /// Reads one chunk and hands it to the protocol.
    ///
    /// Returns `Ok(false)` once the tunnel has closed; the protocol and the
    /// factory have then been told about the loss.
    pub fn pump(&mut self) -> Result<bool, ClientError> {
        let mut buffer = [0u8; READ_CHUNK];
        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => {
                    self.connection.connection_lost(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "tunnel closed by peer",
                    ));
                    return Ok(false);
                }
                Ok(read) => {
                    self.connection.data_received(&buffer[..read])?;
                    return Ok(true);
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => {
                    self.connection.connection_lost(error);
                    return Ok(false);
                }
            }
        }
    }

    /// Delivers inbound data until the tunnel closes, then returns the protocol.
    pub fn run(mut self) -> Result<F::Protocol, ClientError> {
        while self.pump()? {}
        trace_connect!("tunnel {} finished", self.connector);

        self.connection
            .into_protocol()
            .ok_or(ClientError::Session(SessionError::NotConnected))
    }
}

impl<F> fmt::Debug for Tunnel<F>
where
    F: ProtocolFactory<TcpTransport>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tunnel")
            .field("connector", &self.connector)
            .field("phase", &self.connection.phase())
            .finish_non_exhaustive()
    }
}
