//! Socket type enumeration.
//!
//! The variants carry the native library's numeric socket-type values and
//! are passed through verbatim at socket creation.

use std::fmt;

use libc::c_int;

/// Native socket types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SocketType {
    /// PAIR socket for exclusive bidirectional communication
    Pair = 0,

    /// PUB socket for publishing messages to subscribers
    Pub = 1,

    /// SUB socket for subscribing to published messages
    Sub = 2,

    /// REQ socket for synchronous request-reply clients
    Req = 3,

    /// REP socket for synchronous request-reply servers
    Rep = 4,

    /// DEALER socket for asynchronous request-reply patterns
    Dealer = 5,

    /// ROUTER socket for routing messages by identity
    Router = 6,

    /// PULL socket for receiving messages from pushers
    Pull = 7,

    /// PUSH socket for sending messages to pullers
    Push = 8,

    /// XPUB socket for publishers with subscription visibility
    XPub = 9,

    /// XSUB socket for subscribers with explicit subscription messages
    XSub = 10,

    /// STREAM socket for raw connection-oriented transports
    Stream = 11,
}

impl SocketType {
    /// Get the socket type as a string name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pair => "PAIR",
            Self::Pub => "PUB",
            Self::Sub => "SUB",
            Self::Req => "REQ",
            Self::Rep => "REP",
            Self::Dealer => "DEALER",
            Self::Router => "ROUTER",
            Self::Pull => "PULL",
            Self::Push => "PUSH",
            Self::XPub => "XPUB",
            Self::XSub => "XSUB",
            Self::Stream => "STREAM",
        }
    }

    /// Numeric value handed to the native socket constructor.
    #[must_use]
    pub fn to_raw(self) -> c_int {
        self as c_int
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_type_display() {
        assert_eq!(SocketType::Dealer.to_string(), "DEALER");
        assert_eq!(SocketType::Router.to_string(), "ROUTER");
        assert_eq!(SocketType::Pub.to_string(), "PUB");
    }

    #[test]
    fn test_native_values() {
        assert_eq!(SocketType::Pair.to_raw(), 0);
        assert_eq!(SocketType::Sub.to_raw(), 2);
        assert_eq!(SocketType::Push.to_raw(), 8);
        assert_eq!(SocketType::Stream.to_raw(), 11);
    }
}
