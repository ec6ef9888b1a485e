//! # lip-irc
//!
//! The protocol engine of the Lip IRC client.
//!
//! ## Features
//!
//! - Line framing of the inbound byte stream with NUL and overflow checks
//! - RFC 2812 message parsing and serialization
//! - Dispatch of the commands and numerics a chat client acts on
//! - Text markup codec for bold, italic, underline, color and hidden spans
//! - Nick and URL highlighting of incoming messages
//! - Case-insensitive channel registry
//! - Optional Tokio transport with TLS
//!
//! The engine does no I/O of its own. Hosts feed it bytes, drain its
//! outbound queue, and receive display lines and archive records through
//! the [`DisplaySink`] and [`ArchiveSink`] traits.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ```rust
//! use lip_irc::{MemoryDisplay, NullArchive, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::new("me"), MemoryDisplay::default(), NullArchive);
//! session.connected();
//! session.take_output();
//!
//! session.open_channel("#chat").unwrap();
//! session.feed(b":irc.example 353 me = #chat :@alice +bob carol\r\n").unwrap();
//!
//! let chat = session.channels().lookup("#CHAT").unwrap();
//! assert!(chat.has_nick("Alice"));
//! ```

pub mod casemap;
pub mod channel;
pub mod codec;
pub mod command;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod framer;
pub mod highlight;
pub mod markup;
pub mod message;
pub mod nick;
pub mod prefix;
pub mod response;
pub mod session;
pub mod sink;

#[cfg(feature = "tokio")]
pub mod transport;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::channel::{Channel, ChannelRegistry};
pub use self::codec::{IrcCodec, MAX_LINE_LEN};
pub use self::command::Command;
pub use self::config::SessionConfig;
pub use self::connection::{Connection, ConnectionState};
pub use self::error::{
    ArchiveError, ConfigError, FramingError, HandlerError, MessageParseError, ProtocolError,
    SendError,
};
pub use self::framer::LineFramer;
pub use self::highlight::highlight;
pub use self::markup::{Marker, StyleState, StyledRun, Tag};
pub use self::message::{Message, ParsedMessage};
pub use self::nick::{ChannelExt, NickExt};
pub use self::prefix::Prefix;
pub use self::response::Response;
pub use self::session::{Session, APP_NAME, APP_VERSION};
pub use self::sink::{
    ArchiveRecord, ArchiveSink, DisplayLine, DisplaySink, JsonLinesArchive, MemoryDisplay,
    NullArchive, Window,
};
