//! Socket lifecycle monitoring over a real transport.
//!
//! Monitor events are only emitted for connection-oriented transports, so
//! these tests run over loopback TCP with wildcard ports.

use ferrule::{events, options, Context, SocketEvent, SocketType};

/// Drain events until `want` matches one, a timeout passes, or the stream
/// misbehaves. Returns every event seen along the way.
fn collect_until(
    monitor: &ferrule::Socket,
    want: impl Fn(&SocketEvent) -> bool,
) -> Vec<SocketEvent> {
    let mut seen = Vec::new();
    for _ in 0..20 {
        match monitor.next_event() {
            Ok(Some(event)) => {
                let done = want(&event);
                seen.push(event);
                if done {
                    return seen;
                }
            }
            Ok(None) => {}
            Err(err) if err.is_timeout() => return seen,
            Err(err) => panic!("monitor stream failed: {err:?}"),
        }
    }
    seen
}

#[test]
fn server_monitor_reports_listening_then_accepted() {
    let ctx = Context::new().unwrap();

    let server = ctx.socket(SocketType::Pair).unwrap();
    server
        .monitor("inproc://monitor-server", events::EVENT_ALL)
        .unwrap();

    let monitor = ctx.socket(SocketType::Pair).unwrap();
    monitor.set(options::RCVTIMEO, 2000i32).unwrap();
    monitor.connect("inproc://monitor-server").unwrap();

    server.bind("tcp://127.0.0.1:*").unwrap();
    let endpoint: String = server.get(options::LAST_ENDPOINT).unwrap();

    let client = ctx.socket(SocketType::Pair).unwrap();
    client.connect(&endpoint).unwrap();

    let seen = collect_until(&monitor, |e| matches!(e, SocketEvent::Accepted { .. }));

    assert!(
        seen.iter()
            .any(|e| matches!(e, SocketEvent::Listening { .. })),
        "no listening event in {seen:?}"
    );
    assert!(
        seen.iter().any(|e| matches!(e, SocketEvent::Accepted { .. })),
        "no accepted event in {seen:?}"
    );
    // Event addresses point at the monitored socket's endpoint.
    for event in &seen {
        if let SocketEvent::Listening { endpoint: addr, .. } = event {
            assert_eq!(addr, &endpoint);
        }
    }
}

#[test]
fn client_monitor_reports_connected() {
    let ctx = Context::new().unwrap();

    let server = ctx.socket(SocketType::Pair).unwrap();
    server.bind("tcp://127.0.0.1:*").unwrap();
    let endpoint: String = server.get(options::LAST_ENDPOINT).unwrap();

    let client = ctx.socket(SocketType::Pair).unwrap();
    client
        .monitor("inproc://monitor-client", events::EVENT_CONNECTED)
        .unwrap();

    let monitor = ctx.socket(SocketType::Pair).unwrap();
    monitor.set(options::RCVTIMEO, 2000i32).unwrap();
    monitor.connect("inproc://monitor-client").unwrap();

    client.connect(&endpoint).unwrap();

    let seen = collect_until(&monitor, |e| matches!(e, SocketEvent::Connected { .. }));
    match seen.last() {
        Some(SocketEvent::Connected { endpoint: addr, fd }) => {
            assert_eq!(addr, &endpoint);
            assert!(*fd >= 0);
        }
        other => panic!("expected a connected event, got {other:?}"),
    }
}

#[test]
fn idle_monitor_times_out_with_the_dedicated_error() {
    let ctx = Context::new().unwrap();

    let socket = ctx.socket(SocketType::Pair).unwrap();
    socket
        .monitor("inproc://monitor-idle", events::EVENT_ALL)
        .unwrap();

    let monitor = ctx.socket(SocketType::Pair).unwrap();
    monitor.set(options::RCVTIMEO, 100i32).unwrap();
    monitor.connect("inproc://monitor-idle").unwrap();

    let err = monitor.next_event().unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}
