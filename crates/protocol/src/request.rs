use crate::error::EncodingError;
use crate::wire::{COMMAND_CONNECT, REQUEST_HEADER_LEN, SOCKS4_VERSION, UNRESOLVED_ADDRESS};

/// A validated SOCKS4a CONNECT request.
///
/// The destination is stored as raw bytes so hosts that are not valid UTF-8
/// can still be forwarded. Name resolution is always delegated to the proxy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectRequest {
    host: Vec<u8>,
    port: u16,
}

impl ConnectRequest {
    /// Builds a request for `host:port`.
    ///
    /// Fails with [`EncodingError::EmbeddedNul`] when `host` contains a NUL byte.
    pub fn new(host: impl AsRef<[u8]>, port: u16) -> Result<Self, EncodingError> {
        let host = host.as_ref();
        if let Some(position) = host.iter().position(|&byte| byte == 0) {
            return Err(EncodingError::EmbeddedNul { position });
        }

        Ok(Self {
            host: host.to_vec(),
            port,
        })
    }

    /// Returns the destination host bytes.
    #[must_use]
    pub fn host(&self) -> &[u8] {
        &self.host
    }

    /// Returns the destination port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Number of bytes [`Self::to_bytes`] produces.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_LEN + self.host.len() + 1
    }

    /// Appends the wire form of the request to `buffer`.
    pub fn encode_into(&self, buffer: &mut Vec<u8>) {
        buffer.reserve(self.encoded_len());
        buffer.push(SOCKS4_VERSION);
        buffer.push(COMMAND_CONNECT);
        buffer.extend_from_slice(&self.port.to_be_bytes());
        buffer.extend_from_slice(&UNRESOLVED_ADDRESS);
        // empty user id
        buffer.push(0);
        buffer.extend_from_slice(&self.host);
        buffer.push(0);
    }

    /// Renders the request into a freshly allocated buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buffer);
        buffer
    }
}

/// Encodes a CONNECT request for `host:port` in one step.
///
/// # Examples
///
/// ```
/// use protocol::encode_connect_request;
///
/// let bytes = encode_connect_request("a.onion", 443).unwrap();
/// assert_eq!(&bytes[..9], &[4, 1, 0x01, 0xbb, 0, 0, 0, 1, 0]);
/// assert_eq!(&bytes[9..], b"a.onion\0");
/// ```
pub fn encode_connect_request(host: impl AsRef<[u8]>, port: u16) -> Result<Vec<u8>, EncodingError> {
    ConnectRequest::new(host, port).map(|request| request.to_bytes())
}
