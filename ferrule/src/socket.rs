//! Owned sockets and their messaging surface.
//!
//! [`Socket`] owns the native socket object and closes it on drop. All
//! marshalling work is delegated to `ferrule-core`, which only ever sees
//! the borrowed [`SocketHandle`].

use bytes::Bytes;
use libc::{c_int, c_void};
use tracing::debug;

use ferrule_core::endpoint;
use ferrule_core::error::Result;
use ferrule_core::events::{self, SocketEvent};
use ferrule_core::handle::SocketHandle;
use ferrule_core::message::Message;
use ferrule_core::options::{self, FromOption, OptionKind, OptionValue};
use ferrule_core::relay;
use ferrule_core::sendrecv;

use crate::context::Context;
use crate::socket_type::SocketType;

/// An owned native socket.
///
/// Closed on drop; keeps its [`Context`] alive for as long as it exists.
/// Use from one thread of control at a time - the native library permits
/// moving a socket between threads but not concurrent use.
#[derive(Debug)]
pub struct Socket {
    raw: *mut c_void,
    kind: SocketType,
    _context: Context,
}

// Migrating a socket to another thread is allowed by the native library;
// sharing one is not, and the absent Sync impl keeps it that way.
unsafe impl Send for Socket {}

impl Socket {
    pub(crate) fn from_parts(raw: *mut c_void, kind: SocketType, context: Context) -> Self {
        Self {
            raw,
            kind,
            _context: context,
        }
    }

    /// Borrowed handle for use with the `ferrule_core` functions.
    #[must_use]
    pub fn handle(&self) -> SocketHandle {
        // The handle borrows from self, which owns the socket.
        unsafe { SocketHandle::from_raw(self.raw) }
    }

    /// This socket's type.
    #[must_use]
    pub fn kind(&self) -> SocketType {
        self.kind
    }

    // --- connectivity -----------------------------------------------------

    /// Accept incoming connections on `endpoint`.
    pub fn bind(&self, endpoint: &str) -> Result<()> {
        endpoint::bind(self.handle(), endpoint)
    }

    /// Stop accepting connections on a previously bound `endpoint`.
    pub fn unbind(&self, endpoint: &str) -> Result<()> {
        endpoint::unbind(self.handle(), endpoint)
    }

    /// Connect to a peer at `endpoint`.
    pub fn connect(&self, endpoint: &str) -> Result<()> {
        endpoint::connect(self.handle(), endpoint)
    }

    /// Drop an outgoing connection to `endpoint`.
    pub fn disconnect(&self, endpoint: &str) -> Result<()> {
        endpoint::disconnect(self.handle(), endpoint)
    }

    // --- options ----------------------------------------------------------

    /// Write a socket option.
    pub fn set(&self, id: c_int, value: impl Into<OptionValue>) -> Result<()> {
        options::set_option(self.handle(), id, value)
    }

    /// Read a socket option as a concrete Rust type.
    pub fn get<T: FromOption>(&self, id: c_int) -> Result<T> {
        options::get(self.handle(), id)
    }

    /// Read a socket option as the tagged value for `kind`.
    pub fn get_option(&self, id: c_int, kind: OptionKind) -> Result<OptionValue> {
        options::get_option(self.handle(), id, kind)
    }

    /// Apply a sequence of option pairs in order, stopping at the first
    /// failure.
    pub fn configure<I>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (c_int, OptionValue)>,
    {
        options::configure(self.handle(), pairs)
    }

    // --- subscriptions ----------------------------------------------------

    /// Subscribe to each topic prefix in `topics` (SUB/XSUB sockets).
    pub fn subscribe<I, T>(&self, topics: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for topic in topics {
            self.set(options::SUBSCRIBE, topic.as_ref())?;
        }
        Ok(())
    }

    /// Remove each topic prefix in `topics` (SUB/XSUB sockets).
    pub fn unsubscribe<I, T>(&self, topics: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for topic in topics {
            self.set(options::UNSUBSCRIBE, topic.as_ref())?;
        }
        Ok(())
    }

    // --- messaging --------------------------------------------------------

    /// Attempt one send of a single frame under the given flags; `true`
    /// when the native side accepted it, `false` when it would block.
    pub fn try_send(&self, flags: c_int, data: &[u8]) -> Result<bool> {
        sendrecv::try_send(self.handle(), flags, data)
    }

    /// Send one single-frame message, retrying busy attempts.
    pub fn send(&self, data: &[u8]) -> Result<()> {
        sendrecv::send(self.handle(), data)
    }

    /// Send one single-frame message by busy-polling, consulting
    /// `keep_going` after every busy attempt; a `false` aborts with
    /// [`FerruleError::Cancelled`].
    ///
    /// [`FerruleError::Cancelled`]: ferrule_core::error::FerruleError::Cancelled
    pub fn send_with(&self, data: &[u8], keep_going: impl FnMut() -> bool) -> Result<()> {
        sendrecv::send_with(self.handle(), data, keep_going)
    }

    /// Send one frame flagged as part of a larger message; returns `self`
    /// for chaining onto the closing [`send`](Self::send).
    pub fn send_more(&self, data: &[u8]) -> Result<&Self> {
        sendrecv::send_more(self.handle(), data)?;
        Ok(self)
    }

    /// Send a whole multipart message, preserving frame order.
    pub fn send_all<T: AsRef<[u8]>>(&self, frames: &[T]) -> Result<()> {
        sendrecv::send_all(self.handle(), frames)
    }

    /// Send a built [`Message`], preserving frame order.
    pub fn send_message(&self, message: &Message) -> Result<()> {
        sendrecv::send_all(self.handle(), message.frames())
    }

    /// Attempt one receive; `Ok(None)` when the operation would block.
    pub fn try_recv(&self, flags: c_int) -> Result<Option<Bytes>> {
        sendrecv::try_recv(self.handle(), flags)
    }

    /// Receive one frame, retrying busy attempts.
    pub fn recv(&self) -> Result<Bytes> {
        sendrecv::recv(self.handle())
    }

    /// Receive one frame by busy-polling, consulting `keep_going` after
    /// every busy attempt.
    pub fn recv_with(&self, keep_going: impl FnMut() -> bool) -> Result<Bytes> {
        sendrecv::recv_with(self.handle(), keep_going)
    }

    /// Whether the frame just received has more frames in its message.
    ///
    /// Only meaningful immediately after a successful receive.
    pub fn recv_more(&self) -> Result<bool> {
        sendrecv::recv_more(self.handle())
    }

    /// Receive a whole multipart message in arrival order.
    pub fn recv_all(&self) -> Result<Vec<Bytes>> {
        sendrecv::recv_all(self.handle())
    }

    /// Relay one complete multipart message from this socket to `target`
    /// without copying payloads out of native memory.
    pub fn transfer_to(&self, target: &Socket) -> Result<()> {
        relay::transfer(self.handle(), target.handle())
    }

    // --- monitoring -------------------------------------------------------

    /// Start broadcasting lifecycle events for this socket on an inproc
    /// `endpoint`, filtered by the `events` mask.
    pub fn monitor(&self, endpoint: &str, events: c_int) -> Result<()> {
        events::monitor(self.handle(), endpoint, events)
    }

    /// Receive and decode the next lifecycle event (monitor sockets).
    pub fn next_event(&self) -> Result<Option<SocketEvent>> {
        events::next_event(self.handle())
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        unsafe {
            zmq_sys::zmq_close(self.raw);
        }
        debug!(kind = %self.kind, "socket closed");
    }
}
