//! Zero-copy relay of whole messages between two sockets.

use tracing::trace;

use crate::error::Result;
use crate::frame::Frame;
use crate::handle::SocketHandle;
use crate::sendrecv::{self, DONTWAIT, SNDMORE, WAIT};

/// Relay one complete multipart message from `source` to `target`.
///
/// Frame payloads stay in native memory for the whole hop; nothing is
/// copied out to the caller. Per frame: receive (blocking) from `source`,
/// read the more-frames flag, then send to `target` with the more flag while
/// frames remain and no-wait on the last one.
///
/// A failing native call on either side raises immediately and leaves the
/// transfer partially complete; there is no rollback.
pub fn transfer(source: SocketHandle, target: SocketHandle) -> Result<()> {
    let mut relayed = 0usize;
    loop {
        let mut frame = Frame::empty()?;
        sendrecv::recv_frame(source, WAIT, &mut frame, &mut || true)?;
        let more = sendrecv::recv_more(source)?;
        let flags = if more { SNDMORE } else { DONTWAIT };
        sendrecv::send_frame(target, flags, &mut frame, &mut || true)?;
        relayed += 1;
        if !more {
            trace!(frames = relayed, "message relayed");
            return Ok(());
        }
    }
}
