//! Ferrule Core
//!
//! Marshalling core of the ferrule ZeroMQ binding. Everything that touches
//! native memory lives here:
//! - Message-frame lifecycle over `zmq_msg_t` (`frame`)
//! - Multipart message builder (`message`)
//! - Tagged socket-option codec (`options`)
//! - Non-blocking send/receive retry protocol (`sendrecv`)
//! - Socket-to-socket message relay (`relay`)
//! - Monitor-event decoding (`events`)
//! - Endpoint connectivity (`endpoint`)
//! - Error types (`error`)
//!
//! This crate borrows socket handles and never owns them; socket and context
//! ownership lives in the `ferrule` facade crate. A handle must only be used
//! while its owning socket is alive, and from one thread of control at a
//! time - both are native library constraints that nothing here re-checks.

// Allow some pedantic lints that are intentional in this crate
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod endpoint;
pub mod error;
pub mod events;
pub mod frame;
pub mod handle;
pub mod message;
pub mod options;
pub mod relay;
pub mod sendrecv;

// Optional: a small prelude to make downstream crates ergonomic.
// Keep it minimal to avoid API lock-in.
pub mod prelude {
    pub use crate::error::{FerruleError, Result};
    pub use crate::events::SocketEvent;
    pub use crate::frame::Frame;
    pub use crate::handle::SocketHandle;
    pub use crate::message::Message;
    pub use crate::options::{FromOption, OptionKind, OptionValue};
    pub use crate::relay::transfer;
}
