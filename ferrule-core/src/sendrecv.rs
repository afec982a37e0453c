//! Non-blocking send/receive protocol with multipart assembly.
//!
//! Every native send or receive attempt lands in one of three states:
//! - `Okay`: the native call succeeded
//! - `Busy`: the call should be retried (EINTR, or EAGAIN under a
//!   no-wait flag)
//! - `Fail`: any other native error, raised immediately
//!
//! A waiting call reports EAGAIN in exactly one situation: a timeout option
//! configured on the socket expired. That case is surfaced as the dedicated
//! timeout error, never retried.
//!
//! The blocking entry points spin on `Busy` until the attempt succeeds or a
//! caller-supplied hook declines to continue. There is no backoff: with
//! waiting flags the native call itself blocks, so `Busy` is rare and
//! transient.

use bytes::Bytes;
use libc::c_int;

use crate::error::{last_errno, FerruleError, Result};
use crate::frame::Frame;
use crate::handle::SocketHandle;
use crate::options::{self, RCVMORE};

/// Block inside the native call until it can complete.
pub const WAIT: c_int = 0;
/// Do not block waiting for the native call to complete (ZMQ_DONTWAIT).
pub const DONTWAIT: c_int = 1;
/// More frames of the same message follow this one (ZMQ_SNDMORE).
pub const SNDMORE: c_int = 2;

/// Outcome of one native send/receive attempt; failures become errors.
enum Attempt {
    Okay,
    Busy,
}

/// EINTR is always transient. EAGAIN is transient only under a no-wait
/// flag; a waiting call reports it solely when a configured timeout option
/// expired.
fn busy_or_err(flags: c_int) -> Result<Attempt> {
    let errno = last_errno();
    if errno == libc::EINTR {
        return Ok(Attempt::Busy);
    }
    if errno == libc::EAGAIN {
        if flags & DONTWAIT != 0 {
            return Ok(Attempt::Busy);
        }
        return Err(FerruleError::timeout(errno));
    }
    Err(FerruleError::from_errno(errno))
}

fn attempt_send(socket: SocketHandle, flags: c_int, frame: &mut Frame) -> Result<Attempt> {
    let rc = unsafe { zmq_sys::zmq_msg_send(frame.as_mut_ptr(), socket.as_raw(), flags) };
    if rc >= 0 {
        Ok(Attempt::Okay)
    } else {
        // A failed send leaves the frame's content intact for the retry.
        busy_or_err(flags)
    }
}

fn attempt_recv(socket: SocketHandle, flags: c_int, frame: &mut Frame) -> Result<Attempt> {
    let rc = unsafe { zmq_sys::zmq_msg_recv(frame.as_mut_ptr(), socket.as_raw(), flags) };
    if rc >= 0 {
        Ok(Attempt::Okay)
    } else {
        busy_or_err(flags)
    }
}

/// Retry a frame send until it lands or the hook declines to continue.
pub(crate) fn send_frame(
    socket: SocketHandle,
    flags: c_int,
    frame: &mut Frame,
    keep_going: &mut dyn FnMut() -> bool,
) -> Result<()> {
    loop {
        match attempt_send(socket, flags, frame)? {
            Attempt::Okay => return Ok(()),
            Attempt::Busy => {
                if !keep_going() {
                    return Err(FerruleError::Cancelled);
                }
                std::hint::spin_loop();
            }
        }
    }
}

/// Retry a frame receive until one arrives or the hook declines to continue.
pub(crate) fn recv_frame(
    socket: SocketHandle,
    flags: c_int,
    frame: &mut Frame,
    keep_going: &mut dyn FnMut() -> bool,
) -> Result<()> {
    loop {
        match attempt_recv(socket, flags, frame)? {
            Attempt::Okay => return Ok(()),
            Attempt::Busy => {
                if !keep_going() {
                    return Err(FerruleError::Cancelled);
                }
                std::hint::spin_loop();
            }
        }
    }
}

/// Attempt one send of a single frame under the given flags.
///
/// Returns `true` when the native side accepted the frame, `false` when the
/// operation reported busy and should be retried. The native frame buffer is
/// released before returning on every path.
pub fn try_send(socket: SocketHandle, flags: c_int, data: &[u8]) -> Result<bool> {
    let mut frame = Frame::with_payload(data)?;
    match attempt_send(socket, flags, &mut frame)? {
        Attempt::Okay => Ok(true),
        Attempt::Busy => Ok(false),
    }
}

/// Send one single-frame message, waiting inside the native call.
///
/// A send timeout configured on the socket surfaces as the dedicated
/// timeout error.
pub fn send(socket: SocketHandle, data: &[u8]) -> Result<()> {
    let mut frame = Frame::with_payload(data)?;
    send_frame(socket, WAIT, &mut frame, &mut || true)
}

/// Send one single-frame message by busy-polling, consulting `keep_going`
/// after every busy attempt.
///
/// The native call never waits here, so the hook is a responsive
/// cancellation point; a `false` aborts with [`FerruleError::Cancelled`].
pub fn send_with(
    socket: SocketHandle,
    data: &[u8],
    mut keep_going: impl FnMut() -> bool,
) -> Result<()> {
    let mut frame = Frame::with_payload(data)?;
    send_frame(socket, DONTWAIT, &mut frame, &mut keep_going)
}

/// Send one frame flagged as part of a larger message.
///
/// Returns the handle back for chaining onto the closing [`send`].
pub fn send_more(socket: SocketHandle, data: &[u8]) -> Result<SocketHandle> {
    let mut frame = Frame::with_payload(data)?;
    send_frame(socket, SNDMORE, &mut frame, &mut || true)?;
    Ok(socket)
}

/// Send a whole multipart message, preserving frame order.
///
/// Every frame but the last carries the more-frames flag. An empty input is
/// rejected: a message consists of at least one frame.
pub fn send_all<T: AsRef<[u8]>>(socket: SocketHandle, frames: &[T]) -> Result<()> {
    let Some((last, init)) = frames.split_last() else {
        return Err(FerruleError::invalid("a message needs at least one frame"));
    };
    for data in init {
        let mut frame = Frame::with_payload(data.as_ref())?;
        send_frame(socket, SNDMORE, &mut frame, &mut || true)?;
    }
    let mut frame = Frame::with_payload(last.as_ref())?;
    send_frame(socket, WAIT, &mut frame, &mut || true)
}

/// Attempt one receive under the given flags.
///
/// `Ok(None)` means the operation reported busy; the frame buffer used for
/// the attempt is released either way.
pub fn try_recv(socket: SocketHandle, flags: c_int) -> Result<Option<Bytes>> {
    let mut frame = Frame::empty()?;
    match attempt_recv(socket, flags, &mut frame)? {
        Attempt::Okay => Ok(Some(frame.payload())),
        Attempt::Busy => Ok(None),
    }
}

/// Receive one frame, waiting inside the native call.
///
/// A receive timeout configured on the socket surfaces as the dedicated
/// timeout error.
pub fn recv(socket: SocketHandle) -> Result<Bytes> {
    let mut frame = Frame::empty()?;
    recv_frame(socket, WAIT, &mut frame, &mut || true)?;
    Ok(frame.payload())
}

/// Receive one frame by busy-polling, consulting `keep_going` after every
/// busy attempt.
///
/// The native call never waits here, so the hook is a responsive
/// cancellation point; a `false` aborts with [`FerruleError::Cancelled`].
pub fn recv_with(socket: SocketHandle, mut keep_going: impl FnMut() -> bool) -> Result<Bytes> {
    let mut frame = Frame::empty()?;
    recv_frame(socket, DONTWAIT, &mut frame, &mut keep_going)?;
    Ok(frame.payload())
}

/// Whether the frame just received has more frames in its message.
///
/// Only meaningful immediately after a successful receive on this socket.
pub fn recv_more(socket: SocketHandle) -> Result<bool> {
    options::get::<bool>(socket, RCVMORE)
}

/// Receive a whole multipart message in arrival order.
///
/// Finite per call: the sequence ends when the more-frames flag clears.
pub fn recv_all(socket: SocketHandle) -> Result<Vec<Bytes>> {
    let mut frames = vec![recv(socket)?];
    while recv_more(socket)? {
        frames.push(recv(socket)?);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_all_rejects_an_empty_message() {
        // The guard fires before any native call, so a null handle is safe.
        let socket = unsafe { SocketHandle::from_raw(std::ptr::null_mut()) };
        let frames: [&[u8]; 0] = [];
        let err = send_all(socket, &frames).unwrap_err();
        assert!(matches!(err, FerruleError::InvalidOperation(_)));
    }
}
