use std::io;

use thiserror::Error;

use crate::wire::{
    SOCKS4_VERSION, STATUS_IDENTD_MISMATCH, STATUS_NO_IDENTD, STATUS_REJECTED_OR_FAILED,
};

/// Destination could not be expressed as a SOCKS4a domain field.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EncodingError {
    /// The host contains a NUL byte, which would terminate the field early.
    #[error("destination host contains an embedded NUL byte at offset {position}")]
    EmbeddedNul {
        /// Offset of the first NUL byte within the host.
        position: usize,
    },
}

/// Reply bytes that do not form a valid SOCKS4 reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ProtocolError {
    /// The version byte was not 4.
    #[error("unexpected SOCKS reply version {0} (expected {SOCKS4_VERSION})")]
    UnexpectedVersion(u8),
    /// The status byte is not one of the four defined codes.
    #[error("unexpected status {0} in SOCKS4 reply")]
    UnexpectedStatus(u8),
}

impl ProtocolError {
    /// Returns the offending byte regardless of which field carried it.
    #[must_use]
    pub const fn offending_byte(&self) -> u8 {
        match self {
            Self::UnexpectedVersion(byte) | Self::UnexpectedStatus(byte) => *byte,
        }
    }
}

/// Reason a proxy gave for refusing a CONNECT request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum Rejection {
    /// Status 91: the request was rejected or the outbound connection failed.
    #[error("SOCKS4 request rejected or failed")]
    GenericFailure,
    /// Status 92: the proxy could not connect to identd on the client.
    #[error("SOCKS4 request rejected, no identd")]
    NoIdentd,
    /// Status 93: identd reported a user id different from the request.
    #[error("SOCKS4 request rejected, identd doesn't match")]
    IdentdMismatch,
}

impl Rejection {
    /// Maps a status byte onto a rejection, returning `None` for other codes.
    #[must_use]
    pub const fn from_status(status: u8) -> Option<Self> {
        match status {
            STATUS_REJECTED_OR_FAILED => Some(Self::GenericFailure),
            STATUS_NO_IDENTD => Some(Self::NoIdentd),
            STATUS_IDENTD_MISMATCH => Some(Self::IdentdMismatch),
            _ => None,
        }
    }

    /// Returns the status byte that carries this rejection on the wire.
    #[must_use]
    pub const fn status(self) -> u8 {
        match self {
            Self::GenericFailure => STATUS_REJECTED_OR_FAILED,
            Self::NoIdentd => STATUS_NO_IDENTD,
            Self::IdentdMismatch => STATUS_IDENTD_MISMATCH,
        }
    }
}

impl From<EncodingError> for io::Error {
    fn from(err: EncodingError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, err)
    }
}

impl From<ProtocolError> for io::Error {
    fn from(err: ProtocolError) -> Self {
        Self::new(io::ErrorKind::InvalidData, err)
    }
}

impl From<Rejection> for io::Error {
    fn from(err: Rejection) -> Self {
        Self::new(io::ErrorKind::ConnectionRefused, err)
    }
}
