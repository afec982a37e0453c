//! Process-wide messaging context lifecycle.

use std::sync::Arc;

use libc::c_void;
use tracing::debug;

use ferrule_core::error::{last_errno, FerruleError, Result};

use crate::socket::Socket;
use crate::socket_type::SocketType;

/// Sole owner of one native context pointer.
#[derive(Debug)]
struct RawContext {
    raw: *mut c_void,
}

// The native context is the one thread-safe object the library exposes;
// only the raw pointer keeps the compiler from seeing that.
unsafe impl Send for RawContext {}
unsafe impl Sync for RawContext {}

impl Drop for RawContext {
    fn drop(&mut self) {
        // Termination blocks until every socket is closed and can be
        // interrupted by signals; retry until it actually completes.
        loop {
            let rc = unsafe { zmq_sys::zmq_ctx_term(self.raw) };
            if rc == 0 || last_errno() != libc::EINTR {
                break;
            }
        }
    }
}

/// Handle to a native messaging context.
///
/// Cloning is cheap and shares the same native context. The context
/// terminates when the last clone and every socket created from it are
/// gone.
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<RawContext>,
}

impl Context {
    /// Create a new native context.
    ///
    /// # Errors
    ///
    /// Fails with [`FerruleError::Allocation`] if the native library cannot
    /// allocate the context.
    pub fn new() -> Result<Self> {
        let raw = unsafe { zmq_sys::zmq_ctx_new() };
        if raw.is_null() {
            return Err(FerruleError::Allocation {
                errno: last_errno(),
            });
        }
        debug!("messaging context created");
        Ok(Self {
            inner: Arc::new(RawContext { raw }),
        })
    }

    /// Create a socket of the given type inside this context.
    ///
    /// The socket holds its context alive; dropping the last `Context`
    /// clone before open sockets is fine.
    pub fn socket(&self, kind: SocketType) -> Result<Socket> {
        let raw = unsafe { zmq_sys::zmq_socket(self.inner.raw, kind.to_raw()) };
        if raw.is_null() {
            return Err(FerruleError::from_errno(last_errno()));
        }
        debug!(kind = %kind, "socket created");
        Ok(Socket::from_parts(raw, kind, self.clone()))
    }
}
