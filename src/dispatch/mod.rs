//! Routing of parsed messages to handlers.
//!
//! Named commands and interpreted numerics each have a handler. A handler
//! that fails, and any message nobody handles, is shown in the console as
//! a generic logged event. Handler failures never close the connection.

mod commands;
mod numeric;

use tracing::debug;

use crate::command::Command;
use crate::error::HandlerError;
use crate::markup::Tag;
use crate::message::Message;
use crate::session::Session;
use crate::sink::{ArchiveSink, DisplaySink};

type HandlerResult = Result<(), HandlerError>;

/// Fail unless `got` satisfies `ok`.
fn arity(expected: &'static str, got: usize, ok: bool) -> HandlerResult {
    if ok {
        Ok(())
    } else {
        Err(HandlerError::Arity { expected, got })
    }
}

/// Render a message the way the console shows unhandled traffic:
/// `prefix COMMAND p1 ▸p2 ▸p3`.
pub fn logged_event_text(msg: &Message) -> String {
    let mut text = String::new();
    if let Some(prefix) = &msg.prefix {
        text.push_str(prefix);
        text.push(' ');
    }
    text.push_str(&msg.command.to_string());
    for (i, param) in msg.params.iter().enumerate() {
        text.push_str(if i == 0 { " " } else { " \u{25B8}" });
        text.push_str(param);
    }
    text
}

impl<D: DisplaySink, A: ArchiveSink> Session<D, A> {
    pub(crate) fn dispatch(&mut self, msg: &Message) {
        let result = match &msg.command {
            Command::JOIN => self.on_join(msg),
            Command::PART => self.on_part(msg),
            Command::PRIVMSG => self.on_privmsg(msg),
            Command::PING => self.on_ping(msg),
            Command::Numeric(_) => match msg.command.response() {
                Some(response) => self.on_reply(response, msg),
                None => return self.log_event(msg),
            },
            _ => return self.log_event(msg),
        };

        if let Err(error) = result {
            debug!(command = %msg.command, error = %error, "handler failed");
            self.log_event(msg);
        }
    }

    fn log_event(&mut self, msg: &Message) {
        let text = logged_event_text(msg);
        self.console(Some(Tag::Log), &text);
    }
}
