//! Borrowed native socket handles.

use libc::c_void;

/// A borrowed, non-owning reference to a native socket object.
///
/// The owning side (a `Socket` in the facade crate, or an embedder holding a
/// raw libzmq socket) must keep the native object alive across every call
/// that receives the handle. Liveness is not checked here: using a handle
/// after the owner destroyed the socket is undefined behavior in the native
/// library.
///
/// The wrapped raw pointer makes this type `!Send` and `!Sync`, which lines
/// up with the native rule that a socket belongs to one thread of control at
/// a time.
#[derive(Debug, Clone, Copy)]
pub struct SocketHandle {
    raw: *mut c_void,
}

impl SocketHandle {
    /// Wrap a raw native socket pointer.
    ///
    /// # Safety
    ///
    /// `raw` must be a live socket created by the native library, and must
    /// stay alive for every use of the returned handle.
    #[must_use]
    pub const unsafe fn from_raw(raw: *mut c_void) -> Self {
        Self { raw }
    }

    /// The underlying native pointer.
    #[must_use]
    pub const fn as_raw(self) -> *mut c_void {
        self.raw
    }
}
