use super::*;
use crate::factory::SessionFactory;
use crate::test_support::{FactoryEvent, Failure, MockFactory, MockTransport, ProtocolEvent, proxy};
use protocol::Rejection;

type Connection = ProxiedConnection<MockTransport, MockFactory>;

fn connection() -> (SessionFactory<MockTransport, MockFactory>, Connection) {
    let factory = SessionFactory::new("example.onion", 80, MockFactory::default());
    let session = factory.build_session(factory.connector(proxy()));
    (factory, ProxiedConnection::new(session))
}

#[test]
fn phases_follow_successful_handshake() {
    let (factory, mut connection) = connection();
    assert_eq!(connection.phase(), Phase::Connecting);

    connection
        .connection_made(MockTransport::default())
        .expect("first connect");
    assert_eq!(connection.phase(), Phase::AwaitingReply);

    connection.data_received(&[4, 90, 0, 0]).expect("partial");
    assert_eq!(connection.phase(), Phase::AwaitingReply);
    assert!(connection.protocol().is_none());

    connection
        .data_received(&[0, 0, 0, 0, b'h', b'i'])
        .expect("rest of reply");
    assert_eq!(connection.phase(), Phase::HandedOff);
    assert_eq!(factory.upper().built(), 1);
    assert_eq!(
        factory.upper().protocol_events(),
        vec![ProtocolEvent::Connected, ProtocolEvent::Data(b"hi".to_vec())]
    );
    assert!(connection.protocol_mut().is_some());
}

#[test]
fn data_before_connect_is_rejected() {
    let (factory, mut connection) = connection();
    assert_eq!(
        connection.data_received(b"early"),
        Err(SessionError::NotConnected)
    );
    assert_eq!(connection.phase(), Phase::Connecting);
    assert!(factory.upper().events().is_empty());
}

#[test]
fn second_connect_is_rejected() {
    let (_, mut connection) = connection();
    connection
        .connection_made(MockTransport::default())
        .expect("first connect");

    let extra = MockTransport::default();
    assert_eq!(
        connection.connection_made(extra.clone()),
        Err(SessionError::AlreadyConnected)
    );
    assert!(extra.written().is_empty());
    assert_eq!(connection.phase(), Phase::AwaitingReply);
}

#[test]
fn data_after_failed_reply_is_rejected() {
    let (factory, mut connection) = connection();
    connection
        .connection_made(MockTransport::default())
        .expect("connect");
    connection
        .data_received(&[4, 91, 0, 0, 0, 0, 0, 0])
        .expect("reply decoded");
    assert_eq!(connection.phase(), Phase::Failed);

    assert_eq!(
        connection.data_received(b"more"),
        Err(SessionError::AttemptFailed)
    );
    assert_eq!(
        factory.upper().failures(),
        vec![Failure::Rejected(Rejection::GenericFailure)]
    );
}

#[test]
fn data_after_lost_transport_reports_failed_attempt() {
    let (factory, mut connection) = connection();
    connection
        .connection_made(MockTransport::default())
        .expect("connect");
    connection.connection_lost(io::Error::from(io::ErrorKind::ConnectionReset));
    assert_eq!(connection.phase(), Phase::Failed);

    let error = connection
        .data_received(&[4, 90, 0, 0, 0, 0, 0, 0])
        .expect_err("attempt already failed");
    assert_eq!(error, SessionError::AttemptFailed);
    assert_eq!(
        error.to_string(),
        "SOCKS4 connection attempt has already failed"
    );
    assert_eq!(factory.upper().failures().len(), 1);
}

#[test]
fn loss_after_failure_is_absorbed() {
    let (factory, mut connection) = connection();
    connection
        .connection_made(MockTransport::default())
        .expect("connect");
    connection
        .data_received(&[4, 93, 0, 0, 0, 0, 0, 0])
        .expect("reply decoded");

    connection.connection_lost(io::Error::from(io::ErrorKind::ConnectionAborted));
    connection.connection_lost(io::Error::from(io::ErrorKind::ConnectionAborted));

    assert_eq!(
        factory.upper().failures(),
        vec![Failure::Rejected(Rejection::IdentdMismatch)]
    );
    assert!(connection.phase().is_terminal());
}

#[test]
fn loss_while_awaiting_reply_fails_once() {
    let (factory, mut connection) = connection();
    connection
        .connection_made(MockTransport::default())
        .expect("connect");

    connection.connection_lost(io::Error::from(io::ErrorKind::UnexpectedEof));

    assert_eq!(connection.phase(), Phase::Failed);
    assert_eq!(
        factory.upper().events(),
        vec![FactoryEvent::failed_transport(io::ErrorKind::UnexpectedEof)]
    );
}

#[test]
fn loss_before_connect_is_a_connect_failure() {
    let (factory, mut connection) = connection();
    connection.connection_lost(io::Error::from(io::ErrorKind::ConnectionRefused));

    assert_eq!(connection.phase(), Phase::Failed);
    assert_eq!(
        factory.upper().failures(),
        vec![Failure::Transport(io::ErrorKind::ConnectionRefused)]
    );
    assert_eq!(
        connection.connection_failed(io::Error::from(io::ErrorKind::ConnectionRefused)),
        Err(SessionError::AlreadyConnected)
    );
}

#[test]
fn loss_after_handoff_closes_without_failure() {
    let (factory, mut connection) = connection();
    connection
        .connection_made(MockTransport::default())
        .expect("connect");
    connection
        .data_received(&[4, 90, 0, 0, 0, 0, 0, 0])
        .expect("granted");

    connection.connection_lost(io::Error::from(io::ErrorKind::ConnectionReset));

    assert_eq!(connection.phase(), Phase::Closed);
    assert!(factory.upper().failures().is_empty());
    assert_eq!(
        factory.upper().events().last(),
        Some(&FactoryEvent::Lost(io::ErrorKind::ConnectionReset))
    );
    assert_eq!(
        connection.data_received(b"late"),
        Err(SessionError::NotConnected)
    );
    assert!(connection.into_protocol().is_some());
}
