//! Outbound IRC message codec.
//!
//! [`IrcCodec`] turns [`Message`] values into CRLF-terminated wire lines
//! appended to a [`BytesMut`] queue. Inbound framing is the job of
//! [`LineFramer`](crate::LineFramer), which must survive "would block"
//! reads without touching its buffer.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::error::SendError;
use crate::message::Message;

/// Maximum wire line length in bytes, CRLF included.
pub const MAX_LINE_LEN: usize = 512;

/// Tokio codec encoding IRC messages.
#[derive(Debug, Clone)]
pub struct IrcCodec {
    max_len: usize,
}

impl Default for IrcCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl IrcCodec {
    /// Create a codec enforcing the 512 byte line limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Maximum encoded line length, CRLF included.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Check outgoing line data.
    ///
    /// - Rejects CR, LF and NUL, which would split or truncate the line
    /// - Rejects lines longer than the limit once CRLF is added
    pub fn sanitize(&self, data: String) -> Result<String, SendError> {
        if let Some(ch) = data.chars().find(|c| matches!(c, '\r' | '\n' | '\0')) {
            return Err(SendError::IllegalChar(ch));
        }

        let len = data.len() + 2;
        if len > self.max_len {
            return Err(SendError::MessageTooLong {
                len,
                limit: self.max_len,
            });
        }

        Ok(data)
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = SendError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> Result<(), SendError> {
        let line = self.sanitize(msg.to_string())?;
        tracing::trace!(line = %line, "queue");
        dst.reserve(line.len() + 2);
        dst.put(line.as_bytes());
        dst.put(&b"\r\n"[..]);
        Ok(())
    }
}
