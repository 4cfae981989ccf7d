//! Opening tunnels through the proxy over blocking TCP.

mod direct;
mod tunnel;

use std::io::{self, Read};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use logging::trace_connect;
use tracing::warn;
use transport::{Phase, ProtocolFactory, ProxiedConnection, SessionFactory};

use crate::config::{ConfigError, ProxyConfig, load_proxy_from_env};
use crate::error::ClientError;
use crate::options::ConnectOptions;
use crate::tcp::TcpTransport;

pub use tunnel::Tunnel;
use tunnel::{Observed, ObservedFactory, READ_CHUNK, StopGuard};

/// Connects to `host:port` through the SOCKS4a proxy at `proxy`.
///
/// `upper` sees the same notifications it would for a direct connection:
/// start, the attempt beginning, then either a built protocol or exactly one
/// failure, and finally stop. On success the returned [`Tunnel`] owns the
/// socket; the factory is stopped once the tunnel is dropped or finishes
/// running. On failure the factory has already been stopped.
///
/// The host is sent to the proxy verbatim and resolved there.
pub fn connect_socks4a<F>(
    proxy: &ProxyConfig,
    host: &str,
    port: u16,
    upper: F,
    options: &ConnectOptions,
) -> Result<Tunnel<F>, ClientError>
where
    F: ProtocolFactory<TcpTransport>,
{
    let factory: ObservedFactory<F> = SessionFactory::new(host, port, Observed::new(upper));
    let guard = StopGuard::start(factory.clone());
    let connector = factory.connector(proxy.destination());
    factory.started_connecting(&connector);

    let mut connection = ProxiedConnection::new(factory.build_session(connector.clone()));

    let (stream, mut reader) = match open_stream(proxy, options) {
        Ok(pair) => pair,
        Err(error) => {
            connection.connection_failed(error)?;
            return Err(guard.failure(connector));
        }
    };
    trace_connect!("connected to proxy {proxy} for {}", connector.destination());

    connection.connection_made(TcpTransport::new(stream))?;
    await_reply(&mut connection, &mut reader, options.reply_timeout())?;

    if connection.phase() != Phase::HandedOff {
        return Err(guard.failure(connector));
    }
    if let Err(error) = reader.set_read_timeout(None) {
        warn!(target: "socks4a::connect", "failed to clear reply timeout: {error}");
    }

    Ok(Tunnel::new(reader, connection, connector, guard))
}

fn open_stream(
    proxy: &ProxyConfig,
    options: &ConnectOptions,
) -> io::Result<(TcpStream, TcpStream)> {
    let stream = direct::connect_to_proxy(proxy, options)?;
    let reader = stream.try_clone()?;
    Ok((stream, reader))
}

fn reply_timed_out() -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        "timed out waiting for the SOCKS4 reply",
    )
}

/// Reads until the session leaves `AwaitingReply`.
///
/// `timeout` is an overall deadline for the whole reply, not a per-read idle
/// limit, so a proxy trickling bytes cannot stretch the wait.
fn await_reply<F>(
    connection: &mut ProxiedConnection<TcpTransport, Observed<F>>,
    reader: &mut TcpStream,
    timeout: Option<Duration>,
) -> Result<(), ClientError>
where
    F: ProtocolFactory<TcpTransport>,
{
    let mut buffer = [0u8; READ_CHUNK];
    let deadline = timeout.map(|timeout| Instant::now() + timeout);

    while connection.phase() == Phase::AwaitingReply {
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                connection.connection_lost(reply_timed_out());
                continue;
            }
            if let Err(error) = reader.set_read_timeout(Some(remaining)) {
                connection.connection_lost(error);
                continue;
            }
        }

        match reader.read(&mut buffer) {
            Ok(0) => connection.connection_lost(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "proxy closed the connection before replying",
            )),
            Ok(read) => connection.data_received(&buffer[..read])?,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                connection.connection_lost(reply_timed_out());
            }
            Err(error) => connection.connection_lost(error),
        }
    }

    Ok(())
}

/// Routes every connection made through it via one SOCKS4a proxy.
///
/// Create one per proxy and pass it wherever connections are opened; there
/// is no process-wide state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProxyDialer {
    proxy: ProxyConfig,
    options: ConnectOptions,
}

impl ProxyDialer {
    /// Creates a dialer for `proxy`.
    #[must_use]
    pub const fn new(proxy: ProxyConfig, options: ConnectOptions) -> Self {
        Self { proxy, options }
    }

    /// Creates a dialer from [`SOCKS4A_PROXY`](crate::PROXY_ENV).
    ///
    /// Returns `Ok(None)` when the variable is unset or blank.
    pub fn from_env(options: ConnectOptions) -> Result<Option<Self>, ConfigError> {
        Ok(load_proxy_from_env()?.map(|proxy| Self::new(proxy, options)))
    }

    /// Returns the proxy endpoint.
    #[must_use]
    pub const fn proxy(&self) -> &ProxyConfig {
        &self.proxy
    }

    /// Returns the socket options applied to each connection.
    #[must_use]
    pub const fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Connects to `host:port` through the proxy; see [`connect_socks4a`].
    pub fn connect<F>(&self, host: &str, port: u16, upper: F) -> Result<Tunnel<F>, ClientError>
    where
        F: ProtocolFactory<TcpTransport>,
    {
        connect_socks4a(&self.proxy, host, port, upper, &self.options)
    }
}
