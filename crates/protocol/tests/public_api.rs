use protocol::{
    ConnectRequest, EncodingError, ProtocolError, REPLY_LEN, REQUEST_HEADER_LEN, Rejection, Reply,
    ReplyStatus, encode_connect_request, try_decode_reply,
};

fn assert_type_visible<T>() {}

#[test]
fn codec_types_are_publicly_visible() {
    assert_type_visible::<ConnectRequest>();
    assert_type_visible::<Reply>();
    assert_type_visible::<ReplyStatus>();
    assert_type_visible::<Rejection>();
    assert_type_visible::<EncodingError>();
    assert_type_visible::<ProtocolError>();
}

#[test]
fn request_and_reply_lengths_match_wire_format() {
    let request = encode_connect_request("x", 1).expect("valid host");
    assert_eq!(request.len(), REQUEST_HEADER_LEN + 2);

    let reply = [4, 90, 0, 0, 0, 0, 0, 0];
    let (_, consumed) = try_decode_reply(&reply)
        .expect("valid reply")
        .expect("complete reply");
    assert_eq!(consumed, REPLY_LEN);
}

#[test]
fn errors_implement_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<EncodingError>();
    assert_error::<ProtocolError>();
    assert_error::<Rejection>();
}
