//! Endpoint connectivity.
//!
//! Thin wrappers over the native bind/connect family. Address strings use
//! the `transport://address` form and are passed through untouched; the
//! native library owns endpoint parsing and transport mechanics.

use std::ffi::CString;

use libc::{c_char, c_int, c_void};
use tracing::debug;

use crate::error::{last_errno, FerruleError, Result};
use crate::handle::SocketHandle;

type EndpointFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> c_int;

fn apply(socket: SocketHandle, endpoint: &str, op: &'static str, f: EndpointFn) -> Result<()> {
    let c_endpoint = CString::new(endpoint)
        .map_err(|_| FerruleError::invalid("endpoint contains an interior NUL byte"))?;
    let rc = unsafe { f(socket.as_raw(), c_endpoint.as_ptr()) };
    if rc == -1 {
        return Err(FerruleError::from_errno(last_errno()));
    }
    debug!(endpoint, op, "endpoint operation completed");
    Ok(())
}

/// Accept incoming connections on `endpoint`.
pub fn bind(socket: SocketHandle, endpoint: &str) -> Result<()> {
    apply(socket, endpoint, "bind", zmq_sys::zmq_bind)
}

/// Stop accepting connections on a previously bound `endpoint`.
pub fn unbind(socket: SocketHandle, endpoint: &str) -> Result<()> {
    apply(socket, endpoint, "unbind", zmq_sys::zmq_unbind)
}

/// Connect to a peer at `endpoint`.
pub fn connect(socket: SocketHandle, endpoint: &str) -> Result<()> {
    apply(socket, endpoint, "connect", zmq_sys::zmq_connect)
}

/// Drop an outgoing connection to `endpoint`.
pub fn disconnect(socket: SocketHandle, endpoint: &str) -> Result<()> {
    apply(socket, endpoint, "disconnect", zmq_sys::zmq_disconnect)
}
