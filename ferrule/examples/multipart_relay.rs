//! Demonstrates multipart messaging and zero-copy transfer.
//!
//! A three-frame message travels from a producer pair through a relay hop
//! into a consumer pair; the relay never copies payloads out of native
//! memory.

use ferrule::{Context, Message, SocketType};

fn main() -> ferrule::Result<()> {
    ferrule::dev_tracing::init_tracing();

    let ctx = Context::new()?;

    let upstream_rx = ctx.socket(SocketType::Pair)?;
    upstream_rx.bind("inproc://relay-up")?;
    let upstream_tx = ctx.socket(SocketType::Pair)?;
    upstream_tx.connect("inproc://relay-up")?;

    let downstream_rx = ctx.socket(SocketType::Pair)?;
    downstream_rx.bind("inproc://relay-down")?;
    let downstream_tx = ctx.socket(SocketType::Pair)?;
    downstream_tx.connect("inproc://relay-down")?;

    let message = Message::new()
        .push_str("telemetry")
        .push_empty()
        .push(vec![0x01, 0x02, 0x03]);
    upstream_tx.send_message(&message)?;
    println!("sent {} frames upstream", message.len());

    upstream_rx.transfer_to(&downstream_tx)?;
    println!("relayed without touching the payloads");

    let frames = downstream_rx.recv_all()?;
    for (index, frame) in frames.iter().enumerate() {
        println!("frame {index}: {frame:?}");
    }

    Ok(())
}
