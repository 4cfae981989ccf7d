//! In-memory collaborators shared by the unit tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use protocol::{ProtocolError, Rejection};

use crate::address::{Connector, Destination, PeerAddress};
use crate::error::ConnectError;
use crate::traits::{Protocol, ProtocolFactory, Transport};

pub(crate) fn proxy() -> Destination {
    Destination::new("127.0.0.1", 9050)
}

#[derive(Debug, Default)]
pub(crate) struct Wire {
    pub(crate) written: Vec<u8>,
    pub(crate) closed: usize,
}

/// Transport whose writes land in a shared [`Wire`].
#[derive(Clone, Debug, Default)]
pub(crate) struct MockTransport {
    wire: Rc<RefCell<Wire>>,
    fail_writes: bool,
}

impl MockTransport {
    pub(crate) fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub(crate) fn written(&self) -> Vec<u8> {
        self.wire.borrow().written.clone()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.wire.borrow().closed
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.wire.borrow_mut().written.extend_from_slice(data);
        Ok(())
    }

    fn lose_connection(&mut self) {
        self.wire.borrow_mut().closed += 1;
    }
}

/// Comparable summary of a [`ConnectError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Failure {
    Encoding,
    Protocol(ProtocolError),
    Rejected(Rejection),
    Transport(io::ErrorKind),
}

impl From<&ConnectError> for Failure {
    fn from(error: &ConnectError) -> Self {
        match error {
            ConnectError::Encoding(_) => Self::Encoding,
            ConnectError::Protocol(inner) => Self::Protocol(*inner),
            ConnectError::Rejected(inner) => Self::Rejected(*inner),
            ConnectError::Transport(inner) => Self::Transport(inner.kind()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FactoryEvent {
    Started,
    Stopped,
    AttemptStarted(Connector),
    Built(PeerAddress),
    Failed(Failure),
    Lost(io::ErrorKind),
}

impl FactoryEvent {
    pub(crate) const fn failed_transport(kind: io::ErrorKind) -> Self {
        Self::Failed(Failure::Transport(kind))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ProtocolEvent {
    Connected,
    Data(Vec<u8>),
    Lost(io::ErrorKind),
}

/// Upper-layer factory recording every notification it receives.
#[derive(Debug, Default)]
pub(crate) struct MockFactory {
    events: RefCell<Vec<FactoryEvent>>,
    protocol_events: Rc<RefCell<Vec<ProtocolEvent>>>,
}

impl MockFactory {
    pub(crate) fn events(&self) -> Vec<FactoryEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn protocol_events(&self) -> Vec<ProtocolEvent> {
        self.protocol_events.borrow().clone()
    }

    pub(crate) fn failures(&self) -> Vec<Failure> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                FactoryEvent::Failed(failure) => Some(failure.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn built(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, FactoryEvent::Built(_)))
            .count()
    }

    fn record(&self, event: FactoryEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Debug)]
pub(crate) struct MockProtocol {
    transport: Option<MockTransport>,
    events: Rc<RefCell<Vec<ProtocolEvent>>>,
}

impl MockProtocol {
    pub(crate) const fn transport(&self) -> Option<&MockTransport> {
        self.transport.as_ref()
    }
}

impl Protocol<MockTransport> for MockProtocol {
    fn make_connection(&mut self, transport: MockTransport) {
        self.transport = Some(transport);
        self.events.borrow_mut().push(ProtocolEvent::Connected);
    }

    fn data_received(&mut self, data: &[u8]) {
        self.events
            .borrow_mut()
            .push(ProtocolEvent::Data(data.to_vec()));
    }

    fn connection_lost(&mut self, reason: &io::Error) {
        self.events
            .borrow_mut()
            .push(ProtocolEvent::Lost(reason.kind()));
    }
}

impl ProtocolFactory<MockTransport> for MockFactory {
    type Protocol = MockProtocol;

    fn build_protocol(&self, peer: &PeerAddress) -> MockProtocol {
        self.record(FactoryEvent::Built(peer.clone()));
        MockProtocol {
            transport: None,
            events: Rc::clone(&self.protocol_events),
        }
    }

    fn on_start(&self) {
        self.record(FactoryEvent::Started);
    }

    fn on_stop(&self) {
        self.record(FactoryEvent::Stopped);
    }

    fn on_connect_attempt_started(&self, connector: &Connector) {
        self.record(FactoryEvent::AttemptStarted(connector.clone()));
    }

    fn on_connect_failed(&self, _connector: &Connector, reason: ConnectError) {
        self.record(FactoryEvent::Failed(Failure::from(&reason)));
    }

    fn on_connection_lost(&self, _connector: &Connector, reason: &io::Error) {
        self.record(FactoryEvent::Lost(reason.kind()));
    }
}
