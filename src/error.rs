//! Error types for the IRC protocol engine.
//!
//! Faults fall into two policies. Framing and grammar faults are fatal:
//! they surface as [`ProtocolError`] and tear the connection down. Handler,
//! resource-limit and send faults are recoverable: the engine reports them
//! to the user and keeps the connection open.

use thiserror::Error;

/// Fatal protocol errors that terminate the connection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The byte stream could not be framed into lines.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// A framed line did not follow the message grammar.
    #[error("invalid message {string:?}")]
    InvalidMessage {
        /// The raw line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors raised while reassembling lines from the byte stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramingError {
    /// A NUL byte appeared in the unconsumed input.
    #[error("embedded NUL byte at offset {offset}")]
    EmbeddedNul {
        /// Offset of the NUL within the input buffer.
        offset: usize,
    },

    /// The input buffer filled up without a line terminator.
    #[error("line exceeds buffer capacity of {capacity} bytes")]
    Overflow {
        /// Capacity of the input buffer.
        capacity: usize,
    },

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    PeerClosed,

    /// A read failed with something other than "would block".
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when parsing IRC messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// A `:` was not followed by a prefix and a single space.
    #[error("invalid prefix")]
    InvalidPrefix,

    /// Command was neither three digits nor a run of letters.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// Two delimiters with nothing between them.
    #[error("empty parameter at position {position}")]
    EmptyParameter {
        /// Byte position of the stray delimiter.
        position: usize,
    },
}

/// Recoverable faults raised by command and reply handlers.
///
/// A handler that fails leaves the message to the generic logged-event
/// rendering; the connection stays open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandlerError {
    /// Wrong number of parameters.
    #[error("wrong number of parameters: expected {expected}, got {got}")]
    Arity {
        /// Description of the accepted parameter count.
        expected: &'static str,
        /// Actual number of parameters.
        got: usize,
    },

    /// The message needs a sender but has no prefix.
    #[error("missing prefix")]
    MissingPrefix,

    /// The prefix does not follow the nick[!user][@host] grammar.
    #[error("malformed user prefix: {0}")]
    InvalidPrefix(String),

    /// The message came from a server where a user was expected.
    #[error("unexpected server prefix: {0}")]
    ServerPrefix(String),

    /// A nick parameter failed validation.
    #[error("invalid nick: {0}")]
    InvalidNick(String),

    /// A nick the client has no window for.
    #[error("unknown nick: {0}")]
    UnknownNick(String),

    /// A channel the client has no window for.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// An unrecognized NAMES access character.
    #[error("invalid channel access: {0}")]
    InvalidAccess(String),

    /// A CTCP request the client does not answer.
    #[error("unsupported CTCP request: {0:?}")]
    UnsupportedCtcp(String),
}

/// Errors returned to the user when an outbound action is refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SendError {
    /// The encoded line would not fit a single protocol line.
    #[error("message too long ({len} bytes, limit {limit}); please shorten it")]
    MessageTooLong {
        /// Encoded line length including CRLF.
        len: usize,
        /// Maximum line length.
        limit: usize,
    },

    /// The connection is not ready for traffic.
    #[error("not connected")]
    NotConnected,

    /// The target window does not exist.
    #[error("no such window: {0}")]
    UnknownChannel(String),

    /// The name is neither a nick nor a channel name.
    #[error("bad nick or channel name: {0}")]
    BadName(String),

    /// Too many windows are open.
    #[error("too many channels")]
    ChannelLimit,

    /// The text contains characters that cannot travel on the wire.
    #[error("illegal character {0:?} in message")]
    IllegalChar(char),

    /// Writing the encoded line failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SendError {
    fn from(e: std::io::Error) -> Self {
        SendError::Io(e.to_string())
    }
}

/// Errors raised by archive sinks.
///
/// Archive failures are best effort: the engine logs them and moves on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// Writing to the backing store failed.
    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("archive encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while validating a session configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The nick is not a valid IRC nickname.
    #[error("bad nick: {0:?}")]
    BadNick(String),

    /// The server host is empty.
    #[error("bad server host")]
    BadServer,

    /// The TCP port is zero.
    #[error("bad TCP port number")]
    BadPort,

    /// An auto-join entry is not a channel name.
    #[error("bad auto-join channel: {0:?}")]
    BadChannel(String),
}
