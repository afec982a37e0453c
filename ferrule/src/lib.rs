//! # Ferrule
//!
//! Safe Rust binding for a ZeroMQ-style native messaging library.
//!
//! ## Architecture
//!
//! Ferrule is structured in two layers:
//!
//! - **`ferrule-core`**: frame and option marshalling over borrowed socket
//!   handles - native buffer lifecycle, the busy-retry send/receive
//!   protocol, monitor-event decoding
//! - **`ferrule`**: ownership and ergonomics (this crate) - context and
//!   socket lifecycle, socket types, method-style API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferrule::{Context, SocketType};
//!
//! fn main() -> ferrule::Result<()> {
//!     let ctx = Context::new()?;
//!
//!     let server = ctx.socket(SocketType::Pair)?;
//!     server.bind("inproc://demo")?;
//!
//!     let client = ctx.socket(SocketType::Pair)?;
//!     client.connect("inproc://demo")?;
//!
//!     // Two-frame message; the more flag marks the boundary.
//!     client.send_more(b"topic")?.send(b"payload")?;
//!
//!     let frames = server.recv_all()?;
//!     assert_eq!(frames.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Threading
//!
//! A socket belongs to one thread of control at a time (native library
//! constraint). [`Socket`] may be moved across threads but not shared;
//! contexts are freely shareable.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dev_tracing;
pub mod socket;
pub mod socket_type;

// Re-export core types
pub use bytes::Bytes;
pub use ferrule_core::error::{FerruleError, Result};
pub use ferrule_core::events::{self, SocketEvent};
pub use ferrule_core::handle::SocketHandle;
pub use ferrule_core::message::Message;
pub use ferrule_core::options::{self, FromOption, OptionKind, OptionValue};
pub use ferrule_core::sendrecv::{self, DONTWAIT, SNDMORE, WAIT};

pub use context::Context;
pub use socket::Socket;
pub use socket_type::SocketType;

/// Handle-level marshalling core, for embedders bridging raw sockets.
pub use ferrule_core;

// Optional: a small prelude to make downstream code ergonomic.
// Keep it minimal to avoid API lock-in.
pub mod prelude {
    //! Commonly used types, importable in one line.
    pub use crate::context::Context;
    pub use crate::socket::Socket;
    pub use crate::socket_type::SocketType;
    pub use ferrule_core::error::{FerruleError, Result};
    pub use ferrule_core::events::SocketEvent;
    pub use ferrule_core::message::Message;
    pub use ferrule_core::options::{OptionKind, OptionValue};
}
