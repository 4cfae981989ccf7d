use std::net::Ipv4Addr;

use crate::error::{ProtocolError, Rejection};
use crate::wire::{REPLY_LEN, SOCKS4_VERSION, STATUS_GRANTED};

/// Outcome carried by a well-formed reply.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReplyStatus {
    /// Status 90: the tunnel is open.
    Granted,
    /// Status 91-93: the proxy declined.
    Rejected(Rejection),
}

impl ReplyStatus {
    /// Maps a status byte, failing for codes outside 90-93.
    pub const fn from_code(code: u8) -> Result<Self, ProtocolError> {
        if code == STATUS_GRANTED {
            return Ok(Self::Granted);
        }
        match Rejection::from_status(code) {
            Some(rejection) => Ok(Self::Rejected(rejection)),
            None => Err(ProtocolError::UnexpectedStatus(code)),
        }
    }

    /// Returns the status byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Granted => STATUS_GRANTED,
            Self::Rejected(rejection) => rejection.status(),
        }
    }

    /// Reports whether the proxy granted the request.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A parsed SOCKS4 reply.
///
/// The bound port and address are decoded for completeness; CONNECT callers
/// have no use for them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reply {
    status: ReplyStatus,
    bound_port: u16,
    bound_address: Ipv4Addr,
}

impl Reply {
    /// Parses exactly [`REPLY_LEN`] bytes.
    pub fn parse(bytes: &[u8; REPLY_LEN]) -> Result<Self, ProtocolError> {
        if bytes[0] != SOCKS4_VERSION {
            return Err(ProtocolError::UnexpectedVersion(bytes[0]));
        }
        let status = ReplyStatus::from_code(bytes[1])?;

        Ok(Self {
            status,
            bound_port: u16::from_be_bytes([bytes[2], bytes[3]]),
            bound_address: Ipv4Addr::new(bytes[4], bytes[5], bytes[6], bytes[7]),
        })
    }

    /// Returns the outcome of the request.
    #[must_use]
    pub const fn status(&self) -> ReplyStatus {
        self.status
    }

    /// Returns the port field of the reply.
    #[must_use]
    pub const fn bound_port(&self) -> u16 {
        self.bound_port
    }

    /// Returns the address field of the reply.
    #[must_use]
    pub const fn bound_address(&self) -> Ipv4Addr {
        self.bound_address
    }

    /// Converts the reply into `Ok(())` when granted or the proxy's [`Rejection`].
    pub const fn into_result(self) -> Result<(), Rejection> {
        match self.status {
            ReplyStatus::Granted => Ok(()),
            ReplyStatus::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Attempts to decode a reply from the start of `buffer`.
///
/// Returns `Ok(None)` while fewer than [`REPLY_LEN`] bytes are buffered. Once
/// enough bytes are present the first [`REPLY_LEN`] are parsed and the number
/// of consumed bytes is returned alongside the reply; trailing bytes are not
/// inspected.
pub fn try_decode_reply(buffer: &[u8]) -> Result<Option<(Reply, usize)>, ProtocolError> {
    let Some(head) = buffer.first_chunk::<REPLY_LEN>() else {
        return Ok(None);
    };
    Reply::parse(head).map(|reply| Some((reply, REPLY_LEN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn waits_for_eight_bytes() {
        for len in 0..REPLY_LEN {
            let buffer = vec![SOCKS4_VERSION; len];
            assert_eq!(try_decode_reply(&buffer), Ok(None));
        }
    }

    #[test]
    fn decodes_bound_fields() {
        let (reply, consumed) = try_decode_reply(&[4, 90, 0x1f, 0x90, 10, 0, 0, 7])
            .expect("valid reply")
            .expect("complete reply");
        assert_eq!(consumed, REPLY_LEN);
        assert!(reply.status().is_granted());
        assert_eq!(reply.bound_port(), 8080);
        assert_eq!(reply.bound_address(), Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(reply.into_result(), Ok(()));
    }

    #[test]
    fn rejections_map_to_kinds() {
        let cases = [
            (91, Rejection::GenericFailure),
            (92, Rejection::NoIdentd),
            (93, Rejection::IdentdMismatch),
        ];
        for (code, expected) in cases {
            let (reply, _) = try_decode_reply(&[4, code, 0, 0, 0, 0, 0, 0])
                .expect("valid reply")
                .expect("complete reply");
            assert_eq!(reply.status(), ReplyStatus::Rejected(expected));
            assert_eq!(reply.status().code(), code);
            assert_eq!(reply.into_result(), Err(expected));
        }
    }

    #[test]
    fn wrong_version_wins_over_status() {
        assert_eq!(
            try_decode_reply(&[0, 90, 0, 0, 0, 0, 0, 0]),
            Err(ProtocolError::UnexpectedVersion(0))
        );
        assert_eq!(
            try_decode_reply(&[5, 200, 0, 0, 0, 0, 0, 0]),
            Err(ProtocolError::UnexpectedVersion(5))
        );
    }

    proptest! {
        #[test]
        fn granted_regardless_of_bound_fields(
            tail in prop::array::uniform6(any::<u8>()),
            extra in prop::collection::vec(any::<u8>(), 0..16),
        ) {
            let mut buffer = vec![SOCKS4_VERSION, STATUS_GRANTED];
            buffer.extend_from_slice(&tail);
            buffer.extend_from_slice(&extra);

            let (reply, consumed) = try_decode_reply(&buffer).unwrap().unwrap();
            prop_assert_eq!(reply.status(), ReplyStatus::Granted);
            prop_assert_eq!(consumed, REPLY_LEN);
        }

        #[test]
        fn unknown_status_is_a_protocol_error(
            status in any::<u8>().prop_filter("defined codes", |s| !(90..=93).contains(s)),
        ) {
            prop_assert_eq!(
                try_decode_reply(&[SOCKS4_VERSION, status, 0, 0, 0, 0, 0, 0]),
                Err(ProtocolError::UnexpectedStatus(status))
            );
        }

        #[test]
        fn non_four_version_is_a_protocol_error(
            version in any::<u8>().prop_filter("version 4", |v| *v != SOCKS4_VERSION),
            status in any::<u8>(),
        ) {
            prop_assert_eq!(
                try_decode_reply(&[version, status, 0, 0, 0, 0, 0, 0]),
                Err(ProtocolError::UnexpectedVersion(version))
            );
        }
    }
}
