use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use logging::trace_connect;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::config::ProxyConfig;
use crate::options::ConnectOptions;

/// Opens a TCP connection to the proxy, trying each resolved address in turn.
///
/// The error from the last candidate is returned when none accept.
pub(crate) fn connect_to_proxy(
    proxy: &ProxyConfig,
    options: &ConnectOptions,
) -> io::Result<TcpStream> {
    let mut last_error = None;

    for candidate in (proxy.host(), proxy.port()).to_socket_addrs()? {
        trace_connect!("trying proxy address {candidate}");
        match connect_with_optional_bind(
            candidate,
            options.bind_address(),
            options.connect_timeout(),
        ) {
            Ok(stream) => return Ok(stream),
            Err(error) => last_error = Some(error),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("proxy host '{}' did not resolve to any addresses", proxy.host()),
        )
    }))
}

/// Opens a TCP connection to `target`, optionally binding to a local address first.
///
/// When `bind_address` is provided its port is forced to `0` so the OS picks
/// an ephemeral port.
pub(crate) fn connect_with_optional_bind(
    target: SocketAddr,
    bind_address: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let Some(mut bind) = bind_address else {
        return match timeout {
            Some(duration) => TcpStream::connect_timeout(&target, duration),
            None => TcpStream::connect(target),
        };
    };

    if target.is_ipv4() != bind.is_ipv4() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "bind address family does not match proxy address",
        ));
    }

    let domain = if target.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    bind.set_port(0);
    socket.bind(&SockAddr::from(bind))?;

    let target_addr = SockAddr::from(target);
    match timeout {
        Some(duration) => socket.connect_timeout(&target_addr, duration)?,
        None => socket.connect(&target_addr)?,
    }

    Ok(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn binds_to_requested_local_address() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let target = listener.local_addr().expect("listener addr");
        let bind: SocketAddr = "127.0.0.1:4".parse().expect("literal");

        let stream = connect_with_optional_bind(target, Some(bind), Some(Duration::from_secs(5)))
            .expect("connect succeeds");

        let local = stream.local_addr().expect("local addr");
        assert_eq!(local.ip(), bind.ip());
        assert_ne!(local.port(), 4);
    }

    #[test]
    fn rejects_mismatched_bind_family() {
        let target: SocketAddr = "127.0.0.1:9".parse().expect("literal");
        let bind: SocketAddr = "[::1]:0".parse().expect("literal");
        let error = connect_with_optional_bind(target, Some(bind), None).expect_err("mismatch");
        assert_eq!(error.kind(), io::ErrorKind::AddrNotAvailable);
    }

    #[test]
    fn reports_refused_proxy() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let proxy = ProxyConfig::new("127.0.0.1", port);
        let error = connect_to_proxy(&proxy, &ConnectOptions::default()).expect_err("refused");
        assert_eq!(error.kind(), io::ErrorKind::ConnectionRefused);
    }
}
