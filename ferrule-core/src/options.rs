//! Socket-option codec.
//!
//! Generic get/set over the heterogeneously typed options a native socket
//! exposes (`zmq_getsockopt`/`zmq_setsockopt`). The value side is a closed
//! tagged variant: each tag fixes the native buffer layout, so dispatch is
//! an ordinary `match` at the call boundary.
//!
//! Read and write paths size their buffers differently on purpose. A write
//! knows the value, so the native side gets the exact length (zero-length
//! values included). A read does not know the value length in advance, so
//! variable-length options get a generous fixed cap and only the length the
//! native side reports back is decoded.

use libc::{c_int, c_void};
use tracing::trace;

use crate::error::{last_errno, FerruleError, Result};
use crate::handle::SocketHandle;

// Option identifiers, values consistent with libzmq's zmq.h.
/// I/O-thread affinity bitmap (uint64)
pub const AFFINITY: c_int = 4;
/// Socket identity used for ROUTER addressing (binary, 1-255 bytes)
pub const ROUTING_ID: c_int = 5;
/// Add a topic-prefix subscription (SUB/XSUB, binary)
pub const SUBSCRIBE: c_int = 6;
/// Remove a topic-prefix subscription (SUB/XSUB, binary)
pub const UNSUBSCRIBE: c_int = 7;
/// Multicast data rate in kilobits per second (int)
pub const RATE: c_int = 8;
/// Multicast recovery interval in milliseconds (int)
pub const RECOVERY_IVL: c_int = 9;
/// Kernel transmit buffer size in bytes (int)
pub const SNDBUF: c_int = 11;
/// Kernel receive buffer size in bytes (int)
pub const RCVBUF: c_int = 12;
/// More frames of the current message remain to be received (read-only int)
pub const RCVMORE: c_int = 13;
/// Underlying file descriptor of the socket (read-only)
pub const FD: c_int = 14;
/// Pending read/write readiness flags (read-only int)
pub const EVENTS: c_int = 15;
/// Socket type (read-only int)
pub const TYPE: c_int = 16;
/// Linger period for pending messages on close, milliseconds (int)
pub const LINGER: c_int = 17;
/// Initial reconnection interval in milliseconds (int)
pub const RECONNECT_IVL: c_int = 18;
/// Listen backlog for connection-oriented transports (int)
pub const BACKLOG: c_int = 19;
/// Maximum reconnection interval for exponential backoff (int)
pub const RECONNECT_IVL_MAX: c_int = 21;
/// Maximum inbound message size in bytes, -1 for no limit (int64)
pub const MAXMSGSIZE: c_int = 22;
/// Send high water mark in messages (int)
pub const SNDHWM: c_int = 23;
/// Receive high water mark in messages (int)
pub const RCVHWM: c_int = 24;
/// Maximum multicast hops (int)
pub const MULTICAST_HOPS: c_int = 25;
/// Receive timeout in milliseconds, -1 to block forever (int)
pub const RCVTIMEO: c_int = 27;
/// Send timeout in milliseconds, -1 to block forever (int)
pub const SNDTIMEO: c_int = 28;
/// Last endpoint bound or connected by this socket (read-only string)
pub const LAST_ENDPOINT: c_int = 32;
/// Error instead of silent drop for unroutable ROUTER messages (int, 0/1)
pub const ROUTER_MANDATORY: c_int = 33;
/// TCP keepalive behavior: -1 OS default, 0 off, 1 on (int)
pub const TCP_KEEPALIVE: c_int = 34;
/// Queue messages only to completed connections (int, 0/1)
pub const IMMEDIATE: c_int = 39;
/// Report duplicate subscriptions on XPUB sockets (int, 0/1)
pub const XPUB_VERBOSE: c_int = 40;
/// Enable IPv6 on the socket (int, 0/1)
pub const IPV6: c_int = 42;
/// Keep only the most recent inbound message (int, 0/1)
pub const CONFLATE: c_int = 54;

/// Upper bound in bytes for variable-length option reads.
///
/// The actual value length is unknown before the call; the native side
/// reports how much it wrote and only that much is decoded.
const READ_CAP: usize = 255;

/// The value side of a socket-option descriptor.
///
/// Closed set covering the five native encodings: 32-bit integers (booleans
/// ride on them), 64-bit integers of either signedness, character strings,
/// and raw byte buffers. No implicit coercion happens between kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Signed 32-bit integer option
    Int32(i32),
    /// Boolean option, encoded as a 32-bit 0/1 on the wire
    Bool(bool),
    /// Signed 64-bit integer option
    Int64(i64),
    /// Unsigned 64-bit integer option
    UInt64(u64),
    /// Character-string option
    Text(String),
    /// Raw byte-buffer option
    Blob(Vec<u8>),
}

/// Type tag selecting the native buffer layout on the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Read 4 bytes as a signed 32-bit integer
    Int32,
    /// Read 4 bytes as a 32-bit integer, nonzero meaning true
    Bool,
    /// Read 8 bytes as a signed 64-bit integer
    Int64,
    /// Read 8 bytes as an unsigned 64-bit integer
    UInt64,
    /// Read up to the 255-byte cap as a NUL-terminated string
    Text,
    /// Read up to the 255-byte cap as raw bytes
    Blob,
}

impl OptionKind {
    /// Buffer size handed to the native getter for this kind.
    const fn read_len(self) -> usize {
        match self {
            Self::Int32 | Self::Bool => 4,
            Self::Int64 | Self::UInt64 => 8,
            Self::Text | Self::Blob => READ_CAP,
        }
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u64> for OptionValue {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for OptionValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<&[u8]> for OptionValue {
    fn from(v: &[u8]) -> Self {
        Self::Blob(v.to_vec())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for String {}
    impl Sealed for Vec<u8> {}
}

/// Rust-side types an option can be read as.
///
/// The set is sealed: each implementor maps to exactly one [`OptionKind`],
/// so a mismatched read cannot be expressed.
pub trait FromOption: sealed::Sealed + Sized {
    /// Native layout tag used for the read.
    const KIND: OptionKind;

    /// Unpack the decoded variant; `None` on a kind mismatch.
    fn from_option(value: OptionValue) -> Option<Self>;
}

impl FromOption for i32 {
    const KIND: OptionKind = OptionKind::Int32;
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Int32(v) => Some(v),
            _ => None,
        }
    }
}

impl FromOption for bool {
    const KIND: OptionKind = OptionKind::Bool;
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FromOption for i64 {
    const KIND: OptionKind = OptionKind::Int64;
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Int64(v) => Some(v),
            _ => None,
        }
    }
}

impl FromOption for u64 {
    const KIND: OptionKind = OptionKind::UInt64;
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::UInt64(v) => Some(v),
            _ => None,
        }
    }
}

impl FromOption for String {
    const KIND: OptionKind = OptionKind::Text;
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FromOption for Vec<u8> {
    const KIND: OptionKind = OptionKind::Blob;
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Blob(v) => Some(v),
            _ => None,
        }
    }
}

/// Read a socket option, decoding the native buffer per `kind`.
pub fn get_option(socket: SocketHandle, id: c_int, kind: OptionKind) -> Result<OptionValue> {
    let mut buf = [0u8; READ_CAP + 1];
    let mut len = kind.read_len();
    let rc = unsafe {
        zmq_sys::zmq_getsockopt(
            socket.as_raw(),
            id,
            buf.as_mut_ptr().cast::<c_void>(),
            &mut len,
        )
    };
    if rc == -1 {
        return Err(FerruleError::from_errno(last_errno()));
    }
    trace!(id, reported_len = len, "socket option read");
    decode(kind, &buf[..len])
}

/// Read a socket option as a concrete Rust type.
pub fn get<T: FromOption>(socket: SocketHandle, id: c_int) -> Result<T> {
    let value = get_option(socket, id, T::KIND)?;
    T::from_option(value).ok_or_else(|| FerruleError::invalid("option kind mismatch"))
}

/// Write a socket option, encoding per the value's tag.
pub fn set_option(socket: SocketHandle, id: c_int, value: impl Into<OptionValue>) -> Result<()> {
    let value = value.into();
    trace!(id, value = ?value, "setting socket option");
    match &value {
        OptionValue::Int32(v) => set_raw(socket, id, &v.to_ne_bytes()),
        OptionValue::Bool(v) => set_raw(socket, id, &i32::from(*v).to_ne_bytes()),
        OptionValue::Int64(v) => set_raw(socket, id, &v.to_ne_bytes()),
        OptionValue::UInt64(v) => set_raw(socket, id, &v.to_ne_bytes()),
        OptionValue::Text(v) => set_raw(socket, id, v.as_bytes()),
        OptionValue::Blob(v) => set_raw(socket, id, v),
    }
}

/// Apply a sequence of option pairs in order, stopping at the first failure.
///
/// No rollback: options set before the failing one stay set.
pub fn configure<I>(socket: SocketHandle, options: I) -> Result<()>
where
    I: IntoIterator<Item = (c_int, OptionValue)>,
{
    for (id, value) in options {
        set_option(socket, id, value)?;
    }
    Ok(())
}

fn set_raw(socket: SocketHandle, id: c_int, raw: &[u8]) -> Result<()> {
    // Zero-length values are legal (subscribe-to-everything is the classic
    // case); the native side never dereferences the pointer for them.
    let rc = unsafe {
        zmq_sys::zmq_setsockopt(
            socket.as_raw(),
            id,
            raw.as_ptr().cast::<c_void>(),
            raw.len(),
        )
    };
    if rc == -1 {
        return Err(FerruleError::from_errno(last_errno()));
    }
    Ok(())
}

fn decode(kind: OptionKind, raw: &[u8]) -> Result<OptionValue> {
    match kind {
        OptionKind::Int32 => Ok(OptionValue::Int32(int32_from(raw)?)),
        OptionKind::Bool => Ok(OptionValue::Bool(int32_from(raw)? != 0)),
        OptionKind::Int64 => {
            let arr: [u8; 8] = raw.try_into().map_err(|_| malformed(raw.len(), 8))?;
            Ok(OptionValue::Int64(i64::from_ne_bytes(arr)))
        }
        OptionKind::UInt64 => {
            let arr: [u8; 8] = raw.try_into().map_err(|_| malformed(raw.len(), 8))?;
            Ok(OptionValue::UInt64(u64::from_ne_bytes(arr)))
        }
        OptionKind::Text => {
            // String options report their length including the trailing NUL.
            let trimmed = raw.strip_suffix(&[0]).unwrap_or(raw);
            let text = std::str::from_utf8(trimmed)
                .map_err(|_| FerruleError::invalid("option value is not valid UTF-8"))?;
            Ok(OptionValue::Text(text.to_owned()))
        }
        OptionKind::Blob => Ok(OptionValue::Blob(raw.to_vec())),
    }
}

fn int32_from(raw: &[u8]) -> Result<i32> {
    let arr: [u8; 4] = raw.try_into().map_err(|_| malformed(raw.len(), 4))?;
    Ok(i32::from_ne_bytes(arr))
}

fn malformed(got: usize, want: usize) -> FerruleError {
    FerruleError::invalid(format!(
        "native reported {got} bytes for a {want}-byte option value"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_int32_and_bool_share_the_wire_layout() {
        let raw = 42i32.to_ne_bytes();
        assert_eq!(
            decode(OptionKind::Int32, &raw).unwrap(),
            OptionValue::Int32(42)
        );
        assert_eq!(
            decode(OptionKind::Bool, &raw).unwrap(),
            OptionValue::Bool(true)
        );
        assert_eq!(
            decode(OptionKind::Bool, &0i32.to_ne_bytes()).unwrap(),
            OptionValue::Bool(false)
        );
    }

    #[test]
    fn decode_wide_integers() {
        assert_eq!(
            decode(OptionKind::Int64, &(-7i64).to_ne_bytes()).unwrap(),
            OptionValue::Int64(-7)
        );
        assert_eq!(
            decode(OptionKind::UInt64, &u64::MAX.to_ne_bytes()).unwrap(),
            OptionValue::UInt64(u64::MAX)
        );
    }

    #[test]
    fn decode_text_trims_the_trailing_nul() {
        assert_eq!(
            decode(OptionKind::Text, b"inproc://demo\0").unwrap(),
            OptionValue::Text("inproc://demo".to_owned())
        );
        // A value reported without a terminator decodes as-is.
        assert_eq!(
            decode(OptionKind::Text, b"tcp").unwrap(),
            OptionValue::Text("tcp".to_owned())
        );
    }

    #[test]
    fn decode_text_rejects_invalid_utf8() {
        let err = decode(OptionKind::Text, &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, FerruleError::InvalidOperation(_)));
    }

    #[test]
    fn decode_blob_respects_reported_length() {
        assert_eq!(
            decode(OptionKind::Blob, &[1, 2, 3]).unwrap(),
            OptionValue::Blob(vec![1, 2, 3])
        );
        assert_eq!(
            decode(OptionKind::Blob, &[]).unwrap(),
            OptionValue::Blob(Vec::new())
        );
    }

    #[test]
    fn decode_rejects_truncated_integers() {
        let err = decode(OptionKind::Int32, &[1, 2]).unwrap_err();
        assert!(matches!(err, FerruleError::InvalidOperation(_)));
    }

    #[test]
    fn conversions_pick_the_matching_tag() {
        assert_eq!(OptionValue::from(5i32), OptionValue::Int32(5));
        assert_eq!(OptionValue::from(true), OptionValue::Bool(true));
        assert_eq!(OptionValue::from(5i64), OptionValue::Int64(5));
        assert_eq!(OptionValue::from(5u64), OptionValue::UInt64(5));
        assert_eq!(
            OptionValue::from("topic"),
            OptionValue::Text("topic".to_owned())
        );
        assert_eq!(
            OptionValue::from(&b"raw"[..]),
            OptionValue::Blob(b"raw".to_vec())
        );
    }

    #[test]
    fn read_lengths_follow_the_kind() {
        assert_eq!(OptionKind::Int32.read_len(), 4);
        assert_eq!(OptionKind::Bool.read_len(), 4);
        assert_eq!(OptionKind::Int64.read_len(), 8);
        assert_eq!(OptionKind::UInt64.read_len(), 8);
        assert_eq!(OptionKind::Text.read_len(), READ_CAP);
        assert_eq!(OptionKind::Blob.read_len(), READ_CAP);
    }
}
