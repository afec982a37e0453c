//! Socket lifecycle event monitoring.
//!
//! A monitored socket broadcasts its lifecycle transitions on a paired
//! inproc endpoint. Each event arrives as a two-frame message: a
//! fixed-layout record (16-bit event tag followed by a 32-bit value, native
//! endianness) and the affected endpoint address. The value's meaning is
//! keyed by the tag: a file descriptor, a native error number, or a retry
//! interval.

use std::ffi::CString;
use std::fmt;
use std::time::Duration;

use libc::c_int;
use tracing::debug;

use crate::error::{last_errno, strerror, FerruleError, Result};
use crate::handle::SocketHandle;
use crate::sendrecv;

// Event mask bits, values consistent with libzmq's zmq.h.
/// Connection established
pub const EVENT_CONNECTED: c_int = 0x0001;
/// Synchronous connect failed, retry scheduled
pub const EVENT_CONNECT_DELAYED: c_int = 0x0002;
/// Asynchronous reconnect attempt scheduled
pub const EVENT_CONNECT_RETRIED: c_int = 0x0004;
/// Socket listening on a bound address
pub const EVENT_LISTENING: c_int = 0x0008;
/// Bind failed
pub const EVENT_BIND_FAILED: c_int = 0x0010;
/// Incoming connection accepted
pub const EVENT_ACCEPTED: c_int = 0x0020;
/// Accepting an incoming connection failed
pub const EVENT_ACCEPT_FAILED: c_int = 0x0040;
/// Connection closed
pub const EVENT_CLOSED: c_int = 0x0080;
/// Closing a connection failed
pub const EVENT_CLOSE_FAILED: c_int = 0x0100;
/// Peer disconnected
pub const EVENT_DISCONNECTED: c_int = 0x0200;
/// Monitoring on this socket ended
pub const EVENT_MONITOR_STOPPED: c_int = 0x0400;
/// Every event kind
pub const EVENT_ALL: c_int = 0xFFFF;

/// Length of the fixed portion of a native event record: a 16-bit tag
/// followed by a 32-bit value.
const EVENT_RECORD_LEN: usize = 6;

/// One socket lifecycle transition, decoded from a native event record.
///
/// Created once per decode call and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Connection to a peer established.
    Connected {
        /// Address the connection was made to
        endpoint: String,
        /// File descriptor of the new connection
        fd: i32,
    },

    /// A synchronous connect failed; the native side will retry.
    ConnectDelayed {
        /// Address the connect targeted
        endpoint: String,
    },

    /// A reconnect attempt was scheduled.
    ConnectRetried {
        /// Address the reconnect targets
        endpoint: String,
        /// Delay before the next attempt
        interval: Duration,
    },

    /// Socket is listening for incoming connections.
    Listening {
        /// Bound address
        endpoint: String,
        /// File descriptor of the listening socket
        fd: i32,
    },

    /// Bind operation failed.
    BindFailed {
        /// Address the bind targeted
        endpoint: String,
        /// Native error number
        errno: i32,
        /// Human-readable form of the error
        reason: String,
    },

    /// Incoming connection accepted.
    Accepted {
        /// Local address that accepted the connection
        endpoint: String,
        /// File descriptor of the accepted connection
        fd: i32,
    },

    /// Accepting an incoming connection failed.
    AcceptFailed {
        /// Local address the accept happened on
        endpoint: String,
        /// Native error number
        errno: i32,
        /// Human-readable form of the error
        reason: String,
    },

    /// Connection closed.
    Closed {
        /// Address of the closed connection
        endpoint: String,
        /// File descriptor that was closed
        fd: i32,
    },

    /// Closing a connection failed.
    CloseFailed {
        /// Address of the connection that failed to close
        endpoint: String,
        /// Native error number
        errno: i32,
        /// Human-readable form of the error
        reason: String,
    },

    /// Peer disconnected unexpectedly.
    Disconnected {
        /// Address of the lost connection
        endpoint: String,
        /// File descriptor of the lost connection
        fd: i32,
    },

    /// Event monitoring on the observed socket ended.
    MonitorStopped {
        /// Address the monitor was observing
        endpoint: String,
    },

    /// An event tag this build does not know.
    Unknown {
        /// Address carried with the event, possibly empty
        endpoint: String,
        /// Raw event tag
        tag: u16,
        /// Raw tag-specific value
        value: u32,
    },
}

impl fmt::Display for SocketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { endpoint, fd } => write!(f, "connected to {endpoint} (fd {fd})"),
            Self::ConnectDelayed { endpoint } => write!(f, "connect to {endpoint} delayed"),
            Self::ConnectRetried { endpoint, interval } => {
                write!(f, "connect to {endpoint} retried in {interval:?}")
            }
            Self::Listening { endpoint, fd } => write!(f, "listening on {endpoint} (fd {fd})"),
            Self::BindFailed { endpoint, reason, .. } => {
                write!(f, "bind to {endpoint} failed: {reason}")
            }
            Self::Accepted { endpoint, fd } => {
                write!(f, "accepted connection on {endpoint} (fd {fd})")
            }
            Self::AcceptFailed { endpoint, reason, .. } => {
                write!(f, "accept on {endpoint} failed: {reason}")
            }
            Self::Closed { endpoint, fd } => write!(f, "closed {endpoint} (fd {fd})"),
            Self::CloseFailed { endpoint, reason, .. } => {
                write!(f, "close of {endpoint} failed: {reason}")
            }
            Self::Disconnected { endpoint, fd } => write!(f, "disconnected from {endpoint} (fd {fd})"),
            Self::MonitorStopped { endpoint } => write!(f, "monitor for {endpoint} stopped"),
            Self::Unknown { endpoint, tag, value } => {
                write!(f, "unknown event {tag:#06x} (value {value}) on {endpoint}")
            }
        }
    }
}

/// Decode a native event record into a typed event.
///
/// The record layout is validated against the buffer length before any
/// field read. Decoding is total over the tag space: tags this build does
/// not know map to [`SocketEvent::Unknown`] instead of failing.
pub fn decode_event(record: &[u8], endpoint: String) -> Result<SocketEvent> {
    if record.len() < EVENT_RECORD_LEN {
        return Err(FerruleError::invalid(format!(
            "event record too short: {} bytes",
            record.len()
        )));
    }
    let tag = u16::from_ne_bytes([record[0], record[1]]);
    let value = u32::from_ne_bytes([record[2], record[3], record[4], record[5]]);

    Ok(match c_int::from(tag) {
        EVENT_CONNECTED => SocketEvent::Connected {
            endpoint,
            fd: value as i32,
        },
        EVENT_CONNECT_DELAYED => SocketEvent::ConnectDelayed { endpoint },
        EVENT_CONNECT_RETRIED => SocketEvent::ConnectRetried {
            endpoint,
            interval: Duration::from_millis(u64::from(value)),
        },
        EVENT_LISTENING => SocketEvent::Listening {
            endpoint,
            fd: value as i32,
        },
        EVENT_BIND_FAILED => failure(endpoint, value, SocketEvent::bind_failed),
        EVENT_ACCEPTED => SocketEvent::Accepted {
            endpoint,
            fd: value as i32,
        },
        EVENT_ACCEPT_FAILED => failure(endpoint, value, SocketEvent::accept_failed),
        EVENT_CLOSED => SocketEvent::Closed {
            endpoint,
            fd: value as i32,
        },
        EVENT_CLOSE_FAILED => failure(endpoint, value, SocketEvent::close_failed),
        EVENT_DISCONNECTED => SocketEvent::Disconnected {
            endpoint,
            fd: value as i32,
        },
        EVENT_MONITOR_STOPPED => SocketEvent::MonitorStopped { endpoint },
        _ => SocketEvent::Unknown {
            endpoint,
            tag,
            value,
        },
    })
}

impl SocketEvent {
    fn bind_failed(endpoint: String, errno: i32, reason: String) -> Self {
        Self::BindFailed {
            endpoint,
            errno,
            reason,
        }
    }

    fn accept_failed(endpoint: String, errno: i32, reason: String) -> Self {
        Self::AcceptFailed {
            endpoint,
            errno,
            reason,
        }
    }

    fn close_failed(endpoint: String, errno: i32, reason: String) -> Self {
        Self::CloseFailed {
            endpoint,
            errno,
            reason,
        }
    }
}

fn failure(endpoint: String, value: u32, build: fn(String, i32, String) -> SocketEvent) -> SocketEvent {
    let errno = value as i32;
    build(endpoint, errno, strerror(errno))
}

/// Start broadcasting lifecycle events for `socket` on `endpoint`.
///
/// The endpoint must use the inproc transport. Consume the events by
/// connecting a PAIR socket to it and calling [`next_event`], typically
/// from a dedicated thread.
pub fn monitor(socket: SocketHandle, endpoint: &str, events: c_int) -> Result<()> {
    let c_endpoint = CString::new(endpoint)
        .map_err(|_| FerruleError::invalid("endpoint contains an interior NUL byte"))?;
    let rc = unsafe { zmq_sys::zmq_socket_monitor(socket.as_raw(), c_endpoint.as_ptr(), events) };
    if rc == -1 {
        return Err(FerruleError::from_errno(last_errno()));
    }
    debug!(endpoint, events, "socket monitor registered");
    Ok(())
}

/// Receive and decode the next lifecycle event from a monitor socket.
///
/// Blocks until an event pair arrives. A head frame carrying no record
/// yields `Ok(None)`; a configured receive timeout on the monitor socket
/// surfaces as the timeout error kind.
pub fn next_event(monitor: SocketHandle) -> Result<Option<SocketEvent>> {
    let record = sendrecv::recv(monitor)?;
    if record.is_empty() {
        return Ok(None);
    }
    let endpoint = if sendrecv::recv_more(monitor)? {
        let raw = sendrecv::recv(monitor)?;
        String::from_utf8_lossy(&raw).into_owned()
    } else {
        String::new()
    };
    decode_event(&record, endpoint).map(Some)
}
