//! Multipart message builder.
//!
//! A message is a non-empty ordered sequence of frames; the boundary on the
//! wire is the per-frame more flag, not a length prefix. This builder only
//! collects payloads - `sendrecv::send_all` applies the flags.

use bytes::Bytes;

/// Ordered frame payloads for one multipart message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    frames: Vec<Bytes>,
}

impl Message {
    /// Create a new empty message.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Create a single-frame message.
    #[must_use]
    pub fn single(frame: impl Into<Bytes>) -> Self {
        Self {
            frames: vec![frame.into()],
        }
    }

    /// Create a message from existing frames.
    #[must_use]
    pub const fn from_frames(frames: Vec<Bytes>) -> Self {
        Self { frames }
    }

    /// Append a frame from any type convertible to [`Bytes`].
    #[must_use]
    pub fn push(mut self, frame: impl Into<Bytes>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Append a UTF-8 string frame.
    #[must_use]
    pub fn push_str(mut self, s: &str) -> Self {
        self.frames.push(Bytes::copy_from_slice(s.as_bytes()));
        self
    }

    /// Append an empty frame (envelope separators and the like).
    #[must_use]
    pub fn push_empty(mut self) -> Self {
        self.frames.push(Bytes::new());
        self
    }

    /// Number of frames collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if the message has no frames yet.
    ///
    /// An empty message is not sendable; it exists only as a builder state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Borrow the collected frames.
    #[must_use]
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }

    /// Consume the builder and return the frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<Bytes> {
        self.frames
    }
}

impl From<Vec<Bytes>> for Message {
    fn from(frames: Vec<Bytes>) -> Self {
        Self { frames }
    }
}

impl From<Message> for Vec<Bytes> {
    fn from(msg: Message) -> Self {
        msg.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_frames_in_order() {
        let msg = Message::new()
            .push(&b"envelope"[..])
            .push_empty()
            .push_str("body")
            .push(vec![1, 2, 3]);

        assert_eq!(msg.len(), 4);
        assert_eq!(msg.frames()[0], b"envelope"[..]);
        assert_eq!(msg.frames()[1], b""[..]);
        assert_eq!(msg.frames()[2], b"body"[..]);
        assert_eq!(msg.frames()[3], &[1, 2, 3][..]);
    }

    #[test]
    fn single_builds_a_one_frame_message() {
        let msg = Message::single(&b"only"[..]);
        assert_eq!(msg.len(), 1);
        assert!(!msg.is_empty());
    }

    #[test]
    fn into_frames_hands_back_the_payloads() {
        let frames = Message::new().push_str("a").push_str("b").into_frames();
        assert_eq!(frames, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
    }

    #[test]
    fn round_trips_through_vec() {
        let frames = vec![Bytes::from_static(b"x")];
        let msg = Message::from(frames.clone());
        assert_eq!(Vec::<Bytes>::from(msg), frames);
    }
}
