use std::net::SocketAddr;
use std::time::Duration;

/// Default limit for opening the TCP connection to the proxy.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Socket-level knobs for reaching the proxy.
///
/// The reply timeout is a deadline for the whole 8-byte reply, counted from
/// the moment the CONNECT request is sent, however the proxy spreads the
/// bytes out. It is cleared before the tunnel is handed to the upper-layer
/// protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConnectOptions {
    connect_timeout: Option<Duration>,
    reply_timeout: Option<Duration>,
    bind_address: Option<SocketAddr>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            reply_timeout: None,
            bind_address: None,
        }
    }
}

impl ConnectOptions {
    /// Creates options with a 30 second connect timeout and nothing else set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connect timeout; `None` waits for the operating system.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the overall deadline for the proxy's reply.
    #[must_use]
    pub const fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Binds the outgoing socket to `address` before connecting.
    ///
    /// The port is ignored; an ephemeral one is always chosen.
    #[must_use]
    pub const fn with_bind_address(mut self, address: Option<SocketAddr>) -> Self {
        self.bind_address = address;
        self
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns the reply timeout.
    #[must_use]
    pub const fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout
    }

    /// Returns the local bind address.
    #[must_use]
    pub const fn bind_address(&self) -> Option<SocketAddr> {
        self.bind_address
    }
}
