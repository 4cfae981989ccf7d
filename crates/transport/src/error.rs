use std::io;

use protocol::{EncodingError, ProtocolError, Rejection};
use thiserror::Error;

/// Why a connection attempt through the proxy failed.
///
/// Exactly one value is delivered to
/// [`ProtocolFactory::on_connect_failed`](crate::ProtocolFactory::on_connect_failed)
/// per failed attempt. None of the variants are retried internally.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The destination could not be encoded; nothing was sent.
    #[error("cannot build SOCKS4a request: {0}")]
    Encoding(#[from] EncodingError),
    /// The proxy answered with bytes that are not a SOCKS4 reply.
    #[error("malformed SOCKS4 reply: {0}")]
    Protocol(#[from] ProtocolError),
    /// The proxy declined to open the tunnel.
    #[error("{0}")]
    Rejected(#[from] Rejection),
    /// The proxy connection failed or closed before the tunnel opened.
    #[error("proxy connection failed: {0}")]
    Transport(#[from] io::Error),
}

impl ConnectError {
    /// Returns the proxy's rejection reason, if that is what failed.
    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            _ => None,
        }
    }

    /// Returns the underlying I/O error for transport failures.
    #[must_use]
    pub const fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Transport(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ConnectError> for io::Error {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::Encoding(inner) => inner.into(),
            ConnectError::Protocol(inner) => inner.into(),
            ConnectError::Rejected(inner) => inner.into(),
            ConnectError::Transport(inner) => inner,
        }
    }
}

/// An event arrived in an order the session cannot accept.
///
/// These indicate a bug in the code driving the session, not a network
/// condition; they are never reported to the upper-layer factory.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SessionError {
    /// Data arrived before the transport reported it was open.
    #[error("data received before the proxy connection was made")]
    NotConnected,
    /// The transport reported it was open more than once.
    #[error("proxy connection was already made")]
    AlreadyConnected,
    /// Data arrived after the attempt had already failed, whether through a
    /// rejected reply, a protocol error or a lost transport.
    #[error("SOCKS4 connection attempt has already failed")]
    AttemptFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_accessor() {
        let err = ConnectError::from(Rejection::IdentdMismatch);
        assert_eq!(err.rejection(), Some(Rejection::IdentdMismatch));
        assert!(err.io_error().is_none());
        assert_eq!(err.to_string(), "SOCKS4 request rejected, identd doesn't match");
    }

    #[test]
    fn io_conversion_preserves_transport_kind() {
        let err = ConnectError::from(io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(err.io_error().map(io::Error::kind), Some(io::ErrorKind::TimedOut));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn io_conversion_classifies_handshake_failures() {
        let protocol: io::Error = ConnectError::from(ProtocolError::UnexpectedStatus(1)).into();
        assert_eq!(protocol.kind(), io::ErrorKind::InvalidData);

        let rejected: io::Error = ConnectError::from(Rejection::GenericFailure).into();
        assert_eq!(rejected.kind(), io::ErrorKind::ConnectionRefused);
    }
}
