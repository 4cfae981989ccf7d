//! Event dispatcher for callers that cannot hold type-state values.
//!
//! Event loops usually keep one object per connection and push callbacks
//! into it. [`ProxiedConnection`] wraps the session states behind that shape
//! and rejects events that arrive out of order instead of acting on them.

use std::fmt;
use std::io;
use std::mem;

use tracing::warn;

use crate::error::SessionError;
use crate::session::{Advance, AwaitingReply, Established, ProxyClientSession};
use crate::traits::{ProtocolFactory, Transport};

#[cfg(test)]
mod tests;

/// Coarse lifecycle stage of a [`ProxiedConnection`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// The transport to the proxy is not open yet.
    Connecting,
    /// The request was sent and the reply is incomplete.
    AwaitingReply,
    /// The tunnel is open and owned by the upper-layer protocol.
    HandedOff,
    /// The attempt failed and was reported.
    Failed,
    /// An established tunnel closed.
    Closed,
}

impl Phase {
    /// Reports whether no further events will be acted on.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Closed)
    }
}

enum Slot<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    Connecting(ProxyClientSession<T, F>),
    AwaitingReply(AwaitingReply<T, F>),
    HandedOff(Established<T, F>),
    Failed,
    Closed(F::Protocol),
}

impl<T, F> Slot<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    fn from_advance(advance: Advance<T, F>) -> Self {
        match advance {
            Advance::Pending(session) => Self::AwaitingReply(session),
            Advance::HandedOff(established) => Self::HandedOff(established),
            Advance::Failed => Self::Failed,
        }
    }

    const fn phase(&self) -> Phase {
        match self {
            Self::Connecting(_) => Phase::Connecting,
            Self::AwaitingReply(_) => Phase::AwaitingReply,
            Self::HandedOff(_) => Phase::HandedOff,
            Self::Failed => Phase::Failed,
            Self::Closed(_) => Phase::Closed,
        }
    }
}

/// One proxied connection driven by transport callbacks.
pub struct ProxiedConnection<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    slot: Slot<T, F>,
}

impl<T, F> ProxiedConnection<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    /// Wraps a session that has not connected yet.
    #[must_use]
    pub const fn new(session: ProxyClientSession<T, F>) -> Self {
        Self {
            slot: Slot::Connecting(session),
        }
    }

    /// Returns the current lifecycle stage.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.slot.phase()
    }

    /// Handles the transport opening.
    pub fn connection_made(&mut self, transport: T) -> Result<(), SessionError> {
        match mem::replace(&mut self.slot, Slot::Failed) {
            Slot::Connecting(session) => {
                self.slot = Slot::from_advance(session.connection_made(transport));
                Ok(())
            }
            other => {
                self.slot = other;
                Err(SessionError::AlreadyConnected)
            }
        }
    }

    /// Handles a transport that could not be opened.
    pub fn connection_failed(&mut self, reason: io::Error) -> Result<(), SessionError> {
        match mem::replace(&mut self.slot, Slot::Failed) {
            Slot::Connecting(session) => {
                self.slot = Slot::from_advance(session.connection_failed(reason));
                Ok(())
            }
            other => {
                self.slot = other;
                Err(SessionError::AlreadyConnected)
            }
        }
    }

    /// Handles inbound bytes.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] before the transport opened or after it
    /// closed, [`SessionError::AttemptFailed`] once the attempt has failed.
    /// The connection is left unchanged in both cases.
    pub fn data_received(&mut self, data: &[u8]) -> Result<(), SessionError> {
        match mem::replace(&mut self.slot, Slot::Failed) {
            Slot::AwaitingReply(session) => {
                self.slot = Slot::from_advance(session.data_received(data));
                Ok(())
            }
            Slot::HandedOff(mut established) => {
                established.data_received(data);
                self.slot = Slot::HandedOff(established);
                Ok(())
            }
            Slot::Failed => {
                warn!(
                    target: "socks4a::protocol",
                    "ignoring {} bytes received after the attempt failed",
                    data.len()
                );
                Err(SessionError::AttemptFailed)
            }
            other => {
                self.slot = other;
                Err(SessionError::NotConnected)
            }
        }
    }

    /// Handles the transport closing.
    ///
    /// Loss after a failure has already been reported is absorbed, so each
    /// attempt yields a single notification to the upper-layer factory.
    pub fn connection_lost(&mut self, reason: io::Error) {
        self.slot = match mem::replace(&mut self.slot, Slot::Failed) {
            Slot::Connecting(session) => Slot::from_advance(session.connection_failed(reason)),
            Slot::AwaitingReply(session) => Slot::from_advance(session.connection_lost(reason)),
            Slot::HandedOff(established) => Slot::Closed(established.connection_lost(&reason)),
            terminal => terminal,
        };
    }

    /// Returns the upper-layer protocol once the tunnel has opened.
    #[must_use]
    pub fn protocol(&self) -> Option<&F::Protocol> {
        match &self.slot {
            Slot::HandedOff(established) => Some(established.protocol()),
            Slot::Closed(protocol) => Some(protocol),
            _ => None,
        }
    }

    /// Returns the upper-layer protocol mutably once the tunnel has opened.
    pub fn protocol_mut(&mut self) -> Option<&mut F::Protocol> {
        match &mut self.slot {
            Slot::HandedOff(established) => Some(established.protocol_mut()),
            Slot::Closed(protocol) => Some(protocol),
            _ => None,
        }
    }

    /// Unwraps the upper-layer protocol, if the tunnel ever opened.
    pub fn into_protocol(self) -> Option<F::Protocol> {
        match self.slot {
            Slot::HandedOff(established) => Some(established.into_protocol()),
            Slot::Closed(protocol) => Some(protocol),
            _ => None,
        }
    }
}

impl<T, F> fmt::Debug for ProxiedConnection<T, F>
where
    T: Transport,
    F: ProtocolFactory<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxiedConnection")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
