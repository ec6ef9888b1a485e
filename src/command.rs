//! IRC command names.
//!
//! A parsed command is classified once into a closed set of names the
//! client knows about, a numeric reply, or a raw token. Parameters stay on
//! the [`Message`](crate::Message): arity is a handler concern, not a
//! grammar one.

#![allow(clippy::upper_case_acronyms)]

use std::fmt;
use std::str::FromStr;

use crate::response::Response;

/// IRC command name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// `JOIN channels`
    JOIN,
    /// `PART channels [message]`
    PART,
    /// `MODE target [modes]`
    MODE,
    /// `NOTICE target text`
    NOTICE,
    /// `PRIVMSG receivers text`
    PRIVMSG,
    /// `PING server1 [server2]`
    PING,
    /// `PONG server1 [server2]`
    PONG,
    /// `NICK nickname`
    NICK,
    /// `USER user mode unused realname`
    USER,
    /// `QUIT [message]`
    QUIT,
    /// `ERROR message`
    ERROR,
    /// Three-digit numeric reply.
    Numeric(u16),
    /// Any other alphabetic command, kept verbatim.
    Raw(String),
}

impl Command {
    /// The interpreted reply this numeric stands for, if any.
    pub fn response(&self) -> Option<Response> {
        match self {
            Command::Numeric(code) => Response::from_code(*code),
            _ => None,
        }
    }

    /// Commands whose last parameter is always written in trailing form.
    pub(crate) fn is_freeform(&self) -> bool {
        matches!(
            self,
            Command::NOTICE
                | Command::PRIVMSG
                | Command::PONG
                | Command::USER
                | Command::QUIT
                | Command::ERROR
        )
    }
}

impl From<Response> for Command {
    fn from(response: Response) -> Self {
        Command::Numeric(response.code())
    }
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    /// Classify a command token that already passed the grammar check.
    ///
    /// Names match exactly; `privmsg` is a raw command, not `PRIVMSG`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(code) = s.parse() {
                return Ok(Command::Numeric(code));
            }
        }
        Ok(match s {
            "JOIN" => Command::JOIN,
            "PART" => Command::PART,
            "MODE" => Command::MODE,
            "NOTICE" => Command::NOTICE,
            "PRIVMSG" => Command::PRIVMSG,
            "PING" => Command::PING,
            "PONG" => Command::PONG,
            "NICK" => Command::NICK,
            "USER" => Command::USER,
            "QUIT" => Command::QUIT,
            "ERROR" => Command::ERROR,
            other => Command::Raw(other.to_owned()),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::JOIN => "JOIN",
            Command::PART => "PART",
            Command::MODE => "MODE",
            Command::NOTICE => "NOTICE",
            Command::PRIVMSG => "PRIVMSG",
            Command::PING => "PING",
            Command::PONG => "PONG",
            Command::NICK => "NICK",
            Command::USER => "USER",
            Command::QUIT => "QUIT",
            Command::ERROR => "ERROR",
            Command::Numeric(code) => return write!(f, "{:03}", code),
            Command::Raw(name) => name,
        };
        f.write_str(name)
    }
}
