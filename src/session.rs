//! The client session: one server connection and everything it feeds.
//!
//! A [`Session`] owns the connection state, the channel registry and the
//! two output collaborators. All engine entry points run to completion on
//! the caller's thread; once the connection is a zombie they do nothing.
//!
//! ```
//! use lip_irc::{MemoryDisplay, NullArchive, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::new("me"), MemoryDisplay::default(), NullArchive);
//! session.connected();
//! assert_eq!(&session.take_output()[..], b"NICK me\r\nUSER me 0 * :me\r\n");
//!
//! session.feed(b"PING :irc.example\r\n").unwrap();
//! assert_eq!(&session.take_output()[..], b"PONG :irc.example\r\n");
//! ```

use std::io::{self, Read};

use bytes::Bytes;
use chrono::Local;
use tracing::{trace, warn};

use crate::channel::{ChannelRegistry, DayTracker, UNLIMITED};
use crate::config::SessionConfig;
use crate::connection::{Connection, ConnectionState};
use crate::error::{FramingError, ProtocolError, SendError};
use crate::highlight::highlight;
use crate::markup::{decode, encode_archive, encode_wire, Tag};
use crate::message::Message;
use crate::nick::{ChannelExt, NickExt};
use crate::sink::{ArchiveRecord, ArchiveSink, DisplayLine, DisplaySink, Window};

/// Application name used in the title and CTCP VERSION replies.
pub const APP_NAME: &str = "Lip";
/// Application version used in CTCP VERSION replies.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client session state.
#[derive(Debug)]
pub struct Session<D, A> {
    pub(crate) config: SessionConfig,
    pub(crate) nick: String,
    pub(crate) connection: Connection,
    pub(crate) channels: ChannelRegistry,
    display: D,
    archive: A,
    console_day: DayTracker,
}

impl<D: DisplaySink, A: ArchiveSink> Session<D, A> {
    /// Create a session in the `Connecting` state.
    pub fn new(config: SessionConfig, display: D, archive: A) -> Self {
        Self::with_connection(config, display, archive, Connection::new())
    }

    /// Create a session around a pre-built connection, e.g. one with a
    /// custom input buffer capacity.
    pub fn with_connection(
        config: SessionConfig,
        display: D,
        archive: A,
        connection: Connection,
    ) -> Self {
        Self {
            nick: config.nick.clone(),
            config,
            connection,
            channels: ChannelRegistry::new(),
            display,
            archive,
            console_day: DayTracker::default(),
        }
    }

    /// Current local nick.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Connection state.
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Whether the session has been torn down.
    pub fn is_closed(&self) -> bool {
        self.connection.is_zombie()
    }

    /// Open channels.
    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    /// The display collaborator.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display collaborator.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The archive collaborator.
    pub fn archive(&self) -> &A {
        &self.archive
    }

    /// Bytes waiting to be written to the server.
    pub fn pending_output(&self) -> &[u8] {
        self.connection.pending_output()
    }

    /// Take everything waiting to be written to the server.
    pub fn take_output(&mut self) -> Bytes {
        self.connection.take_output()
    }

    /// The transport is up: become ready and log in.
    pub fn connected(&mut self) {
        if self.state() != ConnectionState::Connecting {
            return;
        }
        self.connection.set_state(ConnectionState::Ready);
        let nick = self.nick.clone();
        let full_name = self.config.full_name().to_owned();
        self.emit(Message::nick(nick.as_str()));
        self.emit(Message::user(nick, full_name));
    }

    /// Tear the session down because of `error`, which is returned.
    pub fn tear_down(&mut self, error: ProtocolError) -> ProtocolError {
        if !self.is_closed() {
            warn!(error = %error, "closing connection");
            self.connection.set_state(ConnectionState::Zombie);
        }
        error
    }

    /// Read from a non-blocking `reader` until it would block, handling
    /// every complete line.
    ///
    /// End of stream, read errors, framing faults and unparseable lines
    /// tear the session down and are returned.
    pub fn receive<R: Read>(&mut self, reader: &mut R) -> Result<(), ProtocolError> {
        loop {
            if self.state() != ConnectionState::Ready {
                return Ok(());
            }
            let read = reader.read(self.connection.framer_mut().spare_mut());
            let count = match read {
                Ok(0) => return Err(self.tear_down(FramingError::PeerClosed.into())),
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.tear_down(FramingError::Io(e).into())),
            };
            let lines = match self.connection.framer_mut().commit(count) {
                Ok(lines) => lines,
                Err(e) => return Err(self.tear_down(e.into())),
            };
            for line in lines {
                self.handle_line(&line)?;
            }
        }
    }

    /// Handle bytes already read from the server.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        if self.state() != ConnectionState::Ready {
            return Ok(());
        }
        let lines = match self.connection.framer_mut().feed(bytes) {
            Ok(lines) => lines,
            Err(e) => return Err(self.tear_down(e.into())),
        };
        for line in lines {
            self.handle_line(&line)?;
        }
        Ok(())
    }

    /// Parse and dispatch one line.
    pub fn handle_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        if self.is_closed() {
            return Ok(());
        }
        trace!(line = %line, "recv");
        match line.parse::<Message>() {
            Ok(msg) => {
                self.dispatch(&msg);
                Ok(())
            }
            Err(e) => Err(self.tear_down(e)),
        }
    }

    /// Open a window for a channel or nick, joining channels.
    ///
    /// Returns the case-fold key of the window.
    pub fn open_channel(&mut self, name: &str) -> Result<String, SendError> {
        if self.is_closed() {
            return Err(SendError::NotConnected);
        }
        let is_nick = name.is_valid_nick();
        if !is_nick && !name.is_channel_name() {
            return Err(SendError::BadName(name.to_owned()));
        }
        let channel = self
            .channels
            .open(name, UNLIMITED, false)
            .ok_or(SendError::ChannelLimit)?;
        let key = channel.key().to_owned();
        if !is_nick {
            let join = Message::join(channel.name());
            self.connection.send(join)?;
        }
        Ok(key)
    }

    /// Close the window for `name`, leaving it first if it is a channel.
    pub fn close_channel(&mut self, name: &str) -> Result<(), SendError> {
        if self.state() != ConnectionState::Ready {
            return Err(SendError::NotConnected);
        }
        let channel = self
            .channels
            .lookup(name)
            .ok_or_else(|| SendError::UnknownChannel(name.to_owned()))?;
        if channel.name().is_channel_name() {
            let part = Message::part(channel.name());
            self.connection.send(part)?;
        }
        self.channels.close(name);
        Ok(())
    }

    /// Send styled `text` to an open channel and show it as our own.
    ///
    /// `text` carries marker glyphs. Nothing is sent or shown when the
    /// encoded line would be too long.
    pub fn send_text(&mut self, channel: &str, text: &str) -> Result<(), SendError> {
        if self.state() != ConnectionState::Ready {
            return Err(SendError::NotConnected);
        }
        let target = self
            .channels
            .lookup(channel)
            .ok_or_else(|| SendError::UnknownChannel(channel.to_owned()))?;
        let key = target.key().to_owned();
        let archived = highlight(&encode_archive(text), target.nicks());
        let msg = Message::privmsg(target.name(), encode_wire(text));

        self.connection.send(msg)?;
        let nick = self.nick.clone();
        self.append(&key, Some(&nick), Tag::Mine, &archived);
        Ok(())
    }

    /// Turn auto-join on or off for `name`.
    pub fn set_autojoin(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(channel) = self.channels.lookup_mut(name) {
            channel.autojoin = enabled;
        }
        self.config.set_autojoin(name, enabled)
    }

    /// Say goodbye and close the session. Queued output is kept so the
    /// host can still flush it.
    pub fn quit(&mut self, reason: Option<&str>) {
        if self.is_closed() {
            return;
        }
        if self.state() == ConnectionState::Ready {
            self.emit(Message::quit(reason.map(str::to_owned)));
        }
        self.connection.set_state(ConnectionState::Zombie);
    }

    /// Queue a message, logging refusals.
    pub(crate) fn emit(&mut self, msg: Message) {
        let command = msg.command.clone();
        if let Err(e) = self.connection.send(msg) {
            warn!(%command, error = %e, "dropped outbound message");
        }
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.display.set_title(title);
    }

    /// Show a line in an open channel and archive it.
    pub(crate) fn append(&mut self, key: &str, from: Option<&str>, tag: Tag, text: &str) {
        let Some(channel) = self.channels.lookup_mut(key) else {
            return;
        };
        let time = Local::now();
        let line = DisplayLine {
            time,
            from: from.map(str::to_owned),
            tag: Some(tag),
            runs: decode(text, Some(tag)),
            new_day: channel.day.advance(&time),
        };
        self.display.line(
            Window::Channel {
                key: channel.key(),
                name: channel.name(),
            },
            &line,
        );
        let record = ArchiveRecord {
            channel: channel.key().to_owned(),
            time: time.timestamp(),
            from: line.from.clone(),
            tag: Some(tag),
            text: text.to_owned(),
        };
        channel.push_log(line);
        if let Err(e) = self.archive.record(&record) {
            warn!(channel = %record.channel, error = %e, "archive write failed");
        }
    }

    /// Show a line in the console.
    pub(crate) fn console(&mut self, tag: Option<Tag>, text: &str) {
        let time = Local::now();
        let line = DisplayLine {
            time,
            from: None,
            tag,
            runs: decode(text, tag),
            new_day: self.console_day.advance(&time),
        };
        self.display.line(Window::Console, &line);
    }
}
