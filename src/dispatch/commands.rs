//! Handlers for named commands.

use tracing::debug;

use super::{arity, HandlerResult};
use crate::casemap::irc_eq;
use crate::error::HandlerError;
use crate::highlight::highlight;
use crate::markup::Tag;
use crate::message::Message;
use crate::nick::NickExt;
use crate::prefix::Prefix;
use crate::session::{Session, APP_NAME, APP_VERSION};
use crate::sink::{ArchiveSink, DisplaySink};

/// Most channels a stranger's messages may open.
pub(crate) const PRIVATE_LIMIT: usize = 50;

const CTCP_VERSION: &str = "\x01VERSION\x01";

/// The sender nick of a user prefix.
fn sender_nick(source: &Prefix) -> Result<&str, HandlerError> {
    source
        .nick()
        .ok_or_else(|| HandlerError::ServerPrefix(source.to_string()))
}

/// "alice (a@host) joined" when the mask is known, "alice joined" otherwise.
fn joined_text(source: &Prefix) -> String {
    match (source.nick(), source.user(), source.host()) {
        (Some(nick), Some(user), Some(host)) => format!("{} ({}@{}) joined", nick, user, host),
        (Some(nick), None, Some(host)) => format!("{} ({}@{}) joined", nick, nick, host),
        _ => format!("{} joined", source),
    }
}

impl<D: DisplaySink, A: ArchiveSink> Session<D, A> {
    pub(super) fn on_join(&mut self, msg: &Message) -> HandlerResult {
        arity("at least 1", msg.params.len(), !msg.params.is_empty())?;
        let source = msg.user_source()?;
        let nick = sender_nick(&source)?;
        if irc_eq(nick, &self.nick) {
            debug!(nick = %nick, "own join");
            return Ok(());
        }

        let text = joined_text(&source);
        for name in msg.params[0].split(',').filter(|n| !n.is_empty()) {
            match self.channels.lookup_mut(name) {
                Some(channel) => {
                    channel.add_nick(nick);
                    let key = channel.key().to_owned();
                    self.append(&key, None, Tag::Log, &text);
                }
                None => self.console(Some(Tag::Log), &format!("{} {}", text, name)),
            }
        }
        Ok(())
    }

    pub(super) fn on_part(&mut self, msg: &Message) -> HandlerResult {
        arity("at least 1", msg.params.len(), !msg.params.is_empty())?;
        let source = msg.user_source()?;
        let nick = sender_nick(&source)?;

        let text = format!("{} parted", nick);
        for name in msg.params[0].split(',') {
            if let Some(channel) = self.channels.lookup_mut(name) {
                channel.remove_nick(nick);
                let key = channel.key().to_owned();
                self.append(&key, None, Tag::Log, &text);
            }
        }
        Ok(())
    }

    pub(super) fn on_privmsg(&mut self, msg: &Message) -> HandlerResult {
        arity("exactly 2", msg.params.len(), msg.params.len() == 2)?;
        let source = msg.user_source()?;
        let sender = sender_nick(&source)?;
        let (receivers, text) = (&msg.params[0], &msg.params[1]);

        if text.starts_with('\x01') {
            if text != CTCP_VERSION {
                return Err(HandlerError::UnsupportedCtcp(text.clone()));
            }
            debug!(from = %sender, "CTCP VERSION");
            self.emit(Message::ctcp_version_reply(sender, APP_NAME, APP_VERSION));
            return Ok(());
        }

        for receiver in receivers.split(',') {
            self.post(sender, receiver, text);
        }
        Ok(())
    }

    /// File one PRIVMSG under the window of `receiver`.
    fn post(&mut self, sender: &str, receiver: &str, text: &str) {
        if receiver.is_empty() {
            self.console(Some(Tag::Error), "Ignore empty receiver");
            return;
        }

        let window = if receiver.is_valid_nick() {
            if !irc_eq(receiver, &self.nick) {
                debug!(receiver = %receiver, "private message for someone else");
                return;
            }
            sender
        } else {
            receiver
        };

        let Some(channel) = self.channels.open(window, PRIVATE_LIMIT, false) else {
            self.console(Some(Tag::Error), "Too many channels");
            return;
        };
        let key = channel.key().to_owned();
        let text = highlight(text, channel.nicks());
        self.append(&key, Some(sender), Tag::Theirs, &text);
    }

    pub(super) fn on_ping(&mut self, msg: &Message) -> HandlerResult {
        let got = msg.params.len();
        arity("1 or 2", got, got == 1 || got == 2)?;
        let server2 = msg.params.get(1).cloned();
        self.emit(Message::pong(msg.params[0].as_str(), server2));
        Ok(())
    }
}
