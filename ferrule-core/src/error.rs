//! Ferrule Error Types
//!
//! Error handling for all native-call failures in the binding core.

use std::ffi::CStr;

use libc::c_int;
use thiserror::Error;

/// Main error type for ferrule operations
#[derive(Error, Debug)]
pub enum FerruleError {
    /// Non-zero result from a native call
    #[error("native error {errno}: {message}")]
    Native {
        /// Native errno reported for the failing call
        errno: i32,
        /// Human-readable form supplied by the native library
        message: String,
    },

    /// A send or receive expired against a configured timeout option
    #[error("operation timed out (errno {errno}): {message}")]
    Timeout {
        /// Native errno reported for the expired call
        errno: i32,
        /// Human-readable form supplied by the native library
        message: String,
    },

    /// Caller misuse detected before touching native state
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Native message-buffer or context allocation failed
    #[error("native allocation failed (errno {errno})")]
    Allocation {
        /// Native errno reported for the failed allocation
        errno: i32,
    },

    /// A retry hook declined to continue while the native side stayed busy
    #[error("operation cancelled before completion")]
    Cancelled,
}

/// Result type alias for ferrule operations
pub type Result<T> = std::result::Result<T, FerruleError>;

impl FerruleError {
    /// Create an invalid-operation error with a message
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Build a `Native` error from a native errno
    #[must_use]
    pub fn from_errno(errno: c_int) -> Self {
        Self::Native {
            errno,
            message: strerror(errno),
        }
    }

    /// Build the dedicated timeout kind from a native errno
    #[must_use]
    pub fn timeout(errno: c_int) -> Self {
        Self::Timeout {
            errno,
            message: strerror(errno),
        }
    }

    /// Check if this error is the dedicated timeout kind
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Native errno carried by this error, if any
    #[must_use]
    pub const fn errno(&self) -> Option<i32> {
        match self {
            Self::Native { errno, .. }
            | Self::Timeout { errno, .. }
            | Self::Allocation { errno } => Some(*errno),
            Self::InvalidOperation(_) | Self::Cancelled => None,
        }
    }
}

/// Last errno reported by the native library for the calling thread.
#[must_use]
pub fn last_errno() -> c_int {
    unsafe { zmq_sys::zmq_errno() }
}

/// Human-readable form of a native errno.
///
/// Covers both OS errno values and the native library's own error space.
#[must_use]
pub fn strerror(errno: c_int) -> String {
    // zmq_strerror returns a pointer into a static table; copy it out.
    unsafe { CStr::from_ptr(zmq_sys::zmq_strerror(errno)) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_operation_formats_message() {
        let err = FerruleError::invalid("a message needs at least one frame");
        assert_eq!(
            err.to_string(),
            "invalid operation: a message needs at least one frame"
        );
    }

    #[test]
    fn timeout_is_distinguished_from_native() {
        let timeout = FerruleError::timeout(libc::EAGAIN);
        let native = FerruleError::from_errno(libc::EINVAL);

        assert!(timeout.is_timeout());
        assert!(!native.is_timeout());
        assert_eq!(timeout.errno(), Some(libc::EAGAIN));
        assert_eq!(native.errno(), Some(libc::EINVAL));
    }

    #[test]
    fn misuse_errors_carry_no_errno() {
        assert_eq!(FerruleError::Cancelled.errno(), None);
        assert_eq!(FerruleError::invalid("x").errno(), None);
    }

    #[test]
    fn native_message_comes_from_the_library() {
        let err = FerruleError::from_errno(libc::EINVAL);
        match err {
            FerruleError::Native { errno, message } => {
                assert_eq!(errno, libc::EINVAL);
                assert!(!message.is_empty());
            }
            other => panic!("expected Native, got {other:?}"),
        }
    }
}
