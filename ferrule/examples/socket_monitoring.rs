//! Demonstrates socket lifecycle event monitoring.
//!
//! A server socket broadcasts its lifecycle on an inproc monitor endpoint;
//! a PAIR socket consumes and prints the events as a client connects and
//! disconnects.

use ferrule::{events, options, Context, SocketEvent, SocketType};

fn main() -> ferrule::Result<()> {
    ferrule::dev_tracing::init_tracing();

    let ctx = Context::new()?;

    let server = ctx.socket(SocketType::Pair)?;
    server.monitor("inproc://monitor-demo", events::EVENT_ALL)?;

    let monitor = ctx.socket(SocketType::Pair)?;
    monitor.set(options::RCVTIMEO, 500i32)?;
    monitor.connect("inproc://monitor-demo")?;

    server.bind("tcp://127.0.0.1:*")?;
    let endpoint: String = server.get(options::LAST_ENDPOINT)?;
    println!("server listening on {endpoint}");

    let client = ctx.socket(SocketType::Pair)?;
    client.connect(&endpoint)?;
    client.send(b"hello")?;
    println!("client says: {:?}", server.recv()?);

    client.disconnect(&endpoint)?;

    loop {
        match monitor.next_event() {
            Ok(Some(event)) => {
                println!("event: {event}");
                if matches!(event, SocketEvent::Disconnected { .. }) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) if err.is_timeout() => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
