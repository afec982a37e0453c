//! Native message-frame lifecycle.
//!
//! A [`Frame`] owns exactly one `zmq_msg_t` for its lifetime and is scoped
//! to a single send or receive call (or one hop of a relay loop). The native
//! message structure cannot be copied across call boundaries, so payloads
//! are copied out into [`Bytes`] immediately after receipt; the native
//! buffer is released on drop, on every exit path.

use std::mem;

use bytes::Bytes;

use crate::error::{last_errno, FerruleError, Result};

/// A transient wrapper around one native message unit.
pub struct Frame {
    msg: zmq_sys::zmq_msg_t,
}

impl Frame {
    /// Create an empty frame suitable for receiving into.
    pub fn empty() -> Result<Self> {
        let mut msg: zmq_sys::zmq_msg_t = unsafe { mem::zeroed() };
        let rc = unsafe { zmq_sys::zmq_msg_init(&mut msg) };
        if rc == -1 {
            return Err(FerruleError::Allocation {
                errno: last_errno(),
            });
        }
        Ok(Self { msg })
    }

    /// Create a frame holding a copy of `payload`.
    pub fn with_payload(payload: &[u8]) -> Result<Self> {
        let mut msg: zmq_sys::zmq_msg_t = unsafe { mem::zeroed() };
        let rc = unsafe { zmq_sys::zmq_msg_init_size(&mut msg, payload.len()) };
        if rc == -1 {
            return Err(FerruleError::Allocation {
                errno: last_errno(),
            });
        }
        if !payload.is_empty() {
            // zmq_msg_data may return NULL for a zero-sized message.
            unsafe {
                std::ptr::copy_nonoverlapping(
                    payload.as_ptr(),
                    zmq_sys::zmq_msg_data(&mut msg).cast::<u8>(),
                    payload.len(),
                );
            }
        }
        Ok(Self { msg })
    }

    /// Current payload length in bytes.
    pub fn len(&mut self) -> usize {
        unsafe { zmq_sys::zmq_msg_size(&mut self.msg) }
    }

    /// Check if the frame carries no payload.
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Copy the native buffer out into a caller-owned byte sequence.
    ///
    /// The returned bytes never alias native memory; the frame can be
    /// dropped (or overwritten by the next receive) immediately afterwards.
    pub fn payload(&mut self) -> Bytes {
        let size = self.len();
        if size == 0 {
            return Bytes::new();
        }
        let data = unsafe { zmq_sys::zmq_msg_data(&mut self.msg) };
        let slice = unsafe { std::slice::from_raw_parts(data.cast::<u8>(), size) };
        Bytes::copy_from_slice(slice)
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut zmq_sys::zmq_msg_t {
        &mut self.msg
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        // A successfully sent message was emptied by the native side;
        // closing still releases this zmq_msg_t exactly once.
        unsafe {
            zmq_sys::zmq_msg_close(&mut self.msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_through_native_memory() {
        let mut frame = Frame::with_payload(b"hello frame").unwrap();
        assert_eq!(frame.len(), 11);
        assert_eq!(frame.payload(), Bytes::from_static(b"hello frame"));
        // Copying out is repeatable; the native buffer is untouched.
        assert_eq!(frame.payload(), Bytes::from_static(b"hello frame"));
    }

    #[test]
    fn zero_length_payload_is_valid() {
        let mut frame = Frame::with_payload(b"").unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.payload(), Bytes::new());
    }

    #[test]
    fn empty_frame_starts_with_no_payload() {
        let mut frame = Frame::empty().unwrap();
        assert_eq!(frame.len(), 0);
    }
}
