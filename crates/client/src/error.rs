use std::io;

use protocol::Rejection;
use thiserror::Error;
use transport::{ConnectError, Connector, SessionError};

use crate::config::ConfigError;

/// Error returned by the blocking client.
///
/// When a connection attempt fails, the upper-layer factory has already
/// received the full [`ConnectError`]. [`ClientError::Failed`] carries a
/// summary of that same failure for the caller that started the attempt.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The proxy specification was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The connection attempt failed before the tunnel opened.
    #[error("connection to {connector} failed: {message}")]
    Failed {
        /// The attempt that failed.
        connector: Connector,
        /// I/O classification of the failure.
        kind: io::ErrorKind,
        /// The proxy's rejection, if it declined the request.
        rejection: Option<Rejection>,
        /// Rendered failure reason.
        message: String,
    },
    /// The session was driven out of order.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub(crate) fn failed(connector: Connector, summary: FailureSummary) -> Self {
        Self::Failed {
            connector,
            kind: summary.kind,
            rejection: summary.rejection,
            message: summary.message,
        }
    }

    /// Returns the I/O classification of the error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Config(_) => io::ErrorKind::InvalidInput,
            Self::Failed { kind, .. } => *kind,
            Self::Session(_) => io::ErrorKind::Other,
        }
    }

    /// Returns the proxy's rejection reason, if that is what failed.
    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Failed { rejection, .. } => *rejection,
            _ => None,
        }
    }
}

impl From<ClientError> for io::Error {
    fn from(err: ClientError) -> Self {
        Self::new(err.kind(), err)
    }
}

/// Cloneable record of a [`ConnectError`] taken before it is handed on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FailureSummary {
    kind: io::ErrorKind,
    rejection: Option<Rejection>,
    message: String,
}

impl From<&ConnectError> for FailureSummary {
    fn from(error: &ConnectError) -> Self {
        let kind = match error {
            ConnectError::Encoding(_) => io::ErrorKind::InvalidInput,
            ConnectError::Protocol(_) => io::ErrorKind::InvalidData,
            ConnectError::Rejected(_) => io::ErrorKind::ConnectionRefused,
            ConnectError::Transport(inner) => inner.kind(),
        };
        Self {
            kind,
            rejection: error.rejection(),
            message: error.to_string(),
        }
    }
}
