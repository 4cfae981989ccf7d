//! Per-request factory wrapping the caller's upper-layer factory.

use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::sync::Arc;

use logging::trace_connect;

use crate::address::{Connector, Destination};
use crate::error::ConnectError;
use crate::session::ProxyClientSession;
use crate::traits::{ProtocolFactory, Transport};

/// Builds one [`ProxyClientSession`] per connection attempt and forwards
/// lifecycle notifications to the wrapped factory.
///
/// The factory is created once per logical "connect through the proxy"
/// request and holds only the destination and the wrapped factory. Clones
/// share that state.
pub struct SessionFactory<T, F> {
    inner: Arc<Inner<F>>,
    _transport: PhantomData<fn() -> T>,
}

struct Inner<F> {
    destination: Destination,
    upper: F,
}

impl<T, F> SessionFactory<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    /// Wraps `upper` so its connections to `host:port` go through a proxy.
    pub fn new(host: impl Into<String>, port: u16, upper: F) -> Self {
        Self {
            inner: Arc::new(Inner {
                destination: Destination::new(host, port),
                upper,
            }),
            _transport: PhantomData,
        }
    }

    /// Returns the destination the proxy is asked to reach.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.inner.destination
    }

    /// Returns the wrapped factory.
    #[must_use]
    pub fn upper(&self) -> &F {
        &self.inner.upper
    }

    /// Describes an attempt that reaches the destination via `proxy`.
    #[must_use]
    pub fn connector(&self, proxy: Destination) -> Connector {
        Connector::new(proxy, self.inner.destination.clone())
    }

    /// Forwards factory start.
    pub fn start(&self) {
        self.inner.upper.on_start();
    }

    /// Forwards factory stop.
    pub fn stop(&self) {
        self.inner.upper.on_stop();
    }

    /// Forwards the start of a connection attempt.
    pub fn started_connecting(&self, connector: &Connector) {
        trace_connect!("connecting to {connector}");
        self.inner.upper.on_connect_attempt_started(connector);
    }

    /// Builds the session that will run the handshake for `connector`.
    pub fn build_session(&self, connector: Connector) -> ProxyClientSession<T, F> {
        ProxyClientSession::new(self.clone(), connector)
    }

    /// Forwards a failed attempt verbatim.
    pub fn client_connection_failed(&self, connector: &Connector, reason: ConnectError) {
        trace_connect!("connection to {connector} failed: {reason}");
        self.inner.upper.on_connect_failed(connector, reason);
    }

    /// Reports loss of the proxy connection before the tunnel opened.
    ///
    /// The wrapped factory never saw this connection succeed, so the loss is
    /// delivered as a failed attempt rather than a lost connection.
    pub fn client_connection_lost(&self, connector: &Connector, reason: io::Error) {
        self.client_connection_failed(connector, ConnectError::Transport(reason));
    }
}

impl<T, F> Clone for SessionFactory<T, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _transport: PhantomData,
        }
    }
}

impl<T, F> fmt::Debug for SessionFactory<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFactory")
            .field("destination", &self.inner.destination)
            .finish_non_exhaustive()
    }
}
