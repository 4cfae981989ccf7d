//! crates/protocol/src/codec.rs
//!
//! Async codec for the SOCKS4a handshake using tokio-util.
//!
//! [`Socks4aClientCodec`] encodes [`ConnectRequest`] values and decodes the
//! single [`Reply`] that follows. It is meant to be used with
//! `tokio_util::codec::Framed` for the handshake only; once the reply has been
//! decoded the caller should take the framed parts apart and hand the
//! remaining read buffer to the tunnelled protocol.

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use crate::reply::{Reply, try_decode_reply};
use crate::request::ConnectRequest;
use crate::wire::REPLY_LEN;

/// Client-side codec for the SOCKS4a CONNECT exchange.
///
/// # Example
///
/// ```ignore
/// use futures::{SinkExt, StreamExt};
/// use tokio_util::codec::Framed;
/// use protocol::{ConnectRequest, Socks4aClientCodec};
///
/// async fn example(stream: tokio::net::TcpStream) -> std::io::Result<()> {
///     let request = ConnectRequest::new("example.onion", 80)?;
///     let mut framed = Framed::new(stream, Socks4aClientCodec::new());
///     framed.send(&request).await?;
///     let reply = framed.next().await.transpose()?;
///     let parts = framed.into_parts();
///     // parts.read_buf holds bytes that arrived after the reply
///     Ok(())
/// }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Socks4aClientCodec {
    _private: (),
}

impl Socks4aClientCodec {
    /// Creates a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Decoder for Socks4aClientCodec {
    type Item = Reply;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match try_decode_reply(src)? {
            Some((reply, consumed)) => {
                src.advance(consumed);
                Ok(Some(reply))
            }
            None => {
                src.reserve(REPLY_LEN - src.len());
                Ok(None)
            }
        }
    }
}

impl<'a> Encoder<&'a ConnectRequest> for Socks4aClientCodec {
    type Error = io::Error;

    fn encode(&mut self, item: &'a ConnectRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item.to_bytes());
        Ok(())
    }
}
