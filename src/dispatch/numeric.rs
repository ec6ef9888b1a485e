//! Handlers for the numeric replies the client interprets.

use tracing::info;

use super::{arity, HandlerResult};
use crate::channel::UNLIMITED;
use crate::error::HandlerError;
use crate::markup::Tag;
use crate::message::Message;
use crate::nick::NickExt;
use crate::response::Response;
use crate::session::{Session, APP_NAME};
use crate::sink::{ArchiveSink, DisplaySink};

/// Membership prefixes that may precede a nick in a NAMES reply.
const MEMBERSHIP_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// Channel visibility announced by a NAMES reply.
fn access_name(mode: &str) -> Option<&'static str> {
    match mode {
        "=" => Some("public"),
        "*" => Some("private"),
        "@" => Some("secret"),
        _ => None,
    }
}

/// Server text: every parameter after the target, space separated.
fn server_text(msg: &Message) -> String {
    msg.params.get(1..).unwrap_or_default().join(" ")
}

impl<D: DisplaySink, A: ArchiveSink> Session<D, A> {
    pub(super) fn on_reply(&mut self, response: Response, msg: &Message) -> HandlerResult {
        let params = &msg.params;
        match response {
            Response::RPL_WELCOME => {
                arity("at least 1", params.len(), !params.is_empty())?;
                self.welcome(&params[0]);
                self.console(None, &server_text(msg));
                self.autojoin();
            }
            Response::RPL_AWAY | Response::ERR_NOSUCHNICK => {
                let key = self.known_nick(params)?;
                let (what, tag) = if response.is_error() {
                    ("not known", Tag::Error)
                } else {
                    ("away", Tag::Log)
                };
                let text = format!("{} {}: {}", params[1], what, params[2]);
                self.append(&key, None, tag, &text);
            }
            Response::RPL_NAMREPLY => self.names(params)?,
            Response::RPL_MOTD => {
                arity("at least 1", params.len(), !params.is_empty())?;
                self.console(None, &server_text(msg));
            }
            Response::RPL_ENDOFNAMES | Response::RPL_ENDOFMOTD => {}
        }
        Ok(())
    }

    fn welcome(&mut self, nick: &str) {
        info!(nick = %nick, "registered");
        self.nick = nick.to_owned();
        let title = format!("{}@{}", APP_NAME, nick);
        self.set_title(&title);
    }

    /// Open and join every auto-join channel.
    fn autojoin(&mut self) {
        let names = self.config.autojoin.clone();
        for name in names {
            let Some(channel) = self.channels.open(&name, UNLIMITED, true) else {
                continue;
            };
            let join = Message::join(channel.name());
            self.emit(join);
        }
    }

    /// Check a `<target> <nick> :<text>` reply about a nick with an open
    /// window, returning the window key.
    fn known_nick(&self, params: &[String]) -> Result<String, HandlerError> {
        arity("exactly 3", params.len(), params.len() == 3)?;
        let nick = &params[1];
        if !nick.is_valid_nick() {
            return Err(HandlerError::InvalidNick(nick.clone()));
        }
        self.channels
            .lookup(nick)
            .map(|channel| channel.key().to_owned())
            .ok_or_else(|| HandlerError::UnknownNick(nick.clone()))
    }

    fn names(&mut self, params: &[String]) -> HandlerResult {
        arity("exactly 4", params.len(), params.len() == 4)?;
        let access =
            access_name(&params[1]).ok_or_else(|| HandlerError::InvalidAccess(params[1].clone()))?;

        let mut nicks = Vec::new();
        for raw in params[3].split(' ').filter(|n| !n.is_empty()) {
            let nick = raw.trim_start_matches(MEMBERSHIP_PREFIXES);
            if !nick.is_valid_nick() {
                return Err(HandlerError::InvalidNick(raw.to_owned()));
            }
            nicks.push(nick);
        }

        let channel = self
            .channels
            .lookup_mut(&params[2])
            .ok_or_else(|| HandlerError::UnknownChannel(params[2].clone()))?;
        channel.set_nicks(nicks);
        let key = channel.key().to_owned();
        let text = format!("access {}, present: {}", access, params[3]);
        self.append(&key, None, Tag::Log, &text);
        Ok(())
    }
}
