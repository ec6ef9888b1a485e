//! Connection lifecycle and outbound queue.
//!
//! A [`Connection`] moves forward through
//! `Connecting -> Ready -> Zombie` and never back. Once it is a zombie no
//! more bytes are framed or queued.

use std::fmt;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;
use tracing::debug;

use crate::codec::IrcCodec;
use crate::error::SendError;
use crate::framer::LineFramer;
use crate::message::Message;

/// Lifecycle state of a connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConnectionState {
    /// Transport being established.
    #[default]
    Connecting,
    /// Transport up; traffic flows.
    Ready,
    /// Torn down; every entry point is a no-op.
    Zombie,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Zombie => "zombie",
        })
    }
}

/// Framing buffer, encoder and outbound queue of one server connection.
#[derive(Debug, Default)]
pub struct Connection {
    state: ConnectionState,
    framer: LineFramer,
    codec: IrcCodec,
    outq: BytesMut,
}

impl Connection {
    /// Connection with the default 512 byte input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection with a custom input buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            framer: LineFramer::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the connection has been torn down.
    pub fn is_zombie(&self) -> bool {
        self.state == ConnectionState::Zombie
    }

    /// Move to `new`. Backward moves are refused and return false.
    pub fn set_state(&mut self, new: ConnectionState) -> bool {
        let old = self.state;
        if new < old {
            debug!(%old, %new, "refused backward state transition");
            return false;
        }
        if new != old {
            debug!(%old, %new, "connection state");
            self.state = new;
        }
        if new == ConnectionState::Zombie {
            self.framer.reset();
        }
        true
    }

    /// The inbound line framer.
    pub fn framer_mut(&mut self) -> &mut LineFramer {
        &mut self.framer
    }

    /// Encode `msg` onto the outbound queue.
    pub fn send(&mut self, msg: Message) -> Result<(), SendError> {
        if self.is_zombie() {
            return Err(SendError::NotConnected);
        }
        self.codec.encode(msg, &mut self.outq)
    }

    /// Bytes waiting to be written.
    pub fn pending_output(&self) -> &[u8] {
        &self.outq
    }

    /// Take everything waiting to be written.
    pub fn take_output(&mut self) -> Bytes {
        self.outq.split().freeze()
    }
}
