//! Integration tests for the socket-option codec against a live socket.

use std::time::Duration;

use bytes::Bytes;
use ferrule::{options, Context, OptionKind, OptionValue, SocketType, DONTWAIT};

#[test]
fn int32_options_round_trip() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Pair).unwrap();

    socket.set(options::RCVHWM, 500i32).unwrap();
    socket.set(options::LINGER, 0i32).unwrap();
    socket.set(options::SNDTIMEO, 150i32).unwrap();

    assert_eq!(socket.get::<i32>(options::RCVHWM).unwrap(), 500);
    assert_eq!(socket.get::<i32>(options::LINGER).unwrap(), 0);
    assert_eq!(socket.get::<i32>(options::SNDTIMEO).unwrap(), 150);
}

#[test]
fn bool_options_round_trip() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Dealer).unwrap();

    socket.set(options::IMMEDIATE, true).unwrap();
    assert!(socket.get::<bool>(options::IMMEDIATE).unwrap());

    socket.set(options::IMMEDIATE, false).unwrap();
    assert!(!socket.get::<bool>(options::IMMEDIATE).unwrap());
}

#[test]
fn wide_integer_options_round_trip() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Pair).unwrap();

    socket.set(options::MAXMSGSIZE, 1_048_576i64).unwrap();
    assert_eq!(socket.get::<i64>(options::MAXMSGSIZE).unwrap(), 1_048_576);

    socket.set(options::AFFINITY, 3u64).unwrap();
    assert_eq!(socket.get::<u64>(options::AFFINITY).unwrap(), 3);
}

#[test]
fn blob_option_round_trips_a_routing_id() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Dealer).unwrap();

    socket.set(options::ROUTING_ID, &b"worker-01"[..]).unwrap();
    assert_eq!(
        socket.get::<Vec<u8>>(options::ROUTING_ID).unwrap(),
        b"worker-01".to_vec()
    );
}

#[test]
fn last_endpoint_reads_back_as_text() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Pair).unwrap();
    socket.bind("inproc://options-last").unwrap();

    assert_eq!(
        socket.get::<String>(options::LAST_ENDPOINT).unwrap(),
        "inproc://options-last"
    );
}

#[test]
fn tagged_reads_match_typed_reads() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Pair).unwrap();
    socket.set(options::SNDHWM, 64i32).unwrap();

    assert_eq!(
        socket.get_option(options::SNDHWM, OptionKind::Int32).unwrap(),
        OptionValue::Int32(64)
    );
    assert_eq!(
        socket.get_option(options::TYPE, OptionKind::Int32).unwrap(),
        OptionValue::Int32(SocketType::Pair.to_raw())
    );
}

#[test]
fn configure_applies_in_order_and_stops_at_the_first_failure() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Pair).unwrap();

    socket
        .configure([
            (options::RCVHWM, OptionValue::Int32(64)),
            (options::SNDHWM, OptionValue::Int32(32)),
        ])
        .unwrap();
    assert_eq!(socket.get::<i32>(options::RCVHWM).unwrap(), 64);
    assert_eq!(socket.get::<i32>(options::SNDHWM).unwrap(), 32);

    // The bogus id fails after RCVHWM was already applied; SNDHWM must be
    // left untouched.
    let err = socket
        .configure([
            (options::RCVHWM, OptionValue::Int32(128)),
            (-1, OptionValue::Int32(1)),
            (options::SNDHWM, OptionValue::Int32(999)),
        ])
        .unwrap_err();

    assert_eq!(err.errno(), Some(libc::EINVAL));
    assert_eq!(socket.get::<i32>(options::RCVHWM).unwrap(), 128);
    assert_eq!(socket.get::<i32>(options::SNDHWM).unwrap(), 32);
}

#[test]
fn unknown_option_id_is_a_native_error_not_a_crash() {
    let ctx = Context::new().unwrap();
    let socket = ctx.socket(SocketType::Pair).unwrap();

    let err = socket.get::<i32>(-1).unwrap_err();
    assert_eq!(err.errno(), Some(libc::EINVAL));
}

#[test]
fn zero_length_subscription_is_valid() {
    let ctx = Context::new().unwrap();
    let sub = ctx.socket(SocketType::Sub).unwrap();

    // Empty prefix means subscribe to everything.
    sub.subscribe([&b""[..]]).unwrap();
    sub.unsubscribe([&b""[..]]).unwrap();
}

#[test]
fn subscription_filters_published_topics() {
    let ctx = Context::new().unwrap();
    let publisher = ctx.socket(SocketType::Pub).unwrap();
    publisher.bind("inproc://options-pubsub").unwrap();

    let subscriber = ctx.socket(SocketType::Sub).unwrap();
    subscriber.subscribe([&b"alpha"[..]]).unwrap();
    subscriber.connect("inproc://options-pubsub").unwrap();

    // The subscription travels to the publisher asynchronously; publish
    // until a matching message comes back.
    let mut received = None;
    for _ in 0..100 {
        publisher.send(b"beta filtered-out").unwrap();
        publisher.send(b"alpha hello").unwrap();
        if let Some(frame) = subscriber.try_recv(DONTWAIT).unwrap() {
            received = Some(frame);
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(received, Some(Bytes::from_static(b"alpha hello")));

    // Whatever else is queued must match the subscribed prefix.
    while let Some(frame) = subscriber.try_recv(DONTWAIT).unwrap() {
        assert!(frame.starts_with(b"alpha"));
    }
}
