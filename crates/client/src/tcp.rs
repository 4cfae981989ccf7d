use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use transport::Transport;

/// [`Transport`] over a blocking [`TcpStream`].
///
/// Writes block until the kernel accepted every byte. Closing shuts down both
/// directions, which also wakes any reader holding a clone of the stream.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Wraps a connected stream.
    #[must_use]
    pub const fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Returns the underlying stream.
    #[must_use]
    pub const fn get_ref(&self) -> &TcpStream {
        &self.stream
    }

    /// Returns the local address of the connection to the proxy.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    /// Unwraps the stream.
    #[must_use]
    pub fn into_inner(self) -> TcpStream {
        self.stream
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data)?;
        self.stream.flush()
    }

    fn lose_connection(&mut self) {
        // already-closed sockets report NotConnected, which is fine here
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
