//! IRC message prefix types.
//!
//! An IRC message prefix identifies the origin of a message. It can be either
//! a server name or a user's `nick[!user][@host]` mask.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use crate::error::HandlerError;
use crate::nick::NickExt;

/// IRC message prefix - identifies the origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname); absent parts are empty.
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a prefix string, validating the nick of user prefixes.
    ///
    /// - `nick!user@host` → user prefix with all three parts
    /// - `nick@host` → user prefix without a username
    /// - `name` → user prefix if `name` is a valid nick, otherwise a server
    ///
    /// A `!` without a following `@`, or an invalid nick in front of `!` or
    /// `@`, is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use lip_irc::Prefix;
    ///
    /// let prefix = Prefix::parse("alice!a@host").unwrap();
    /// assert_eq!(prefix.nick(), Some("alice"));
    /// assert_eq!(prefix.user(), Some("a"));
    /// assert!(Prefix::parse("irc.example.net").unwrap().is_server());
    /// ```
    pub fn parse(s: &str) -> Result<Self, HandlerError> {
        let invalid = || HandlerError::InvalidPrefix(s.to_owned());

        match s.find(['!', '@']) {
            None if s.is_valid_nick() => Ok(Prefix::Nickname(s.into(), String::new(), String::new())),
            None => Ok(Prefix::ServerName(s.into())),
            Some(pos) => {
                let nick = &s[..pos];
                if !nick.is_valid_nick() {
                    return Err(invalid());
                }
                let rest = &s[pos + 1..];
                if s.as_bytes()[pos] == b'@' {
                    return Ok(Prefix::Nickname(nick.into(), String::new(), rest.into()));
                }
                let (user, host) = rest.split_once('@').ok_or_else(invalid)?;
                Ok(Prefix::Nickname(nick.into(), user.into(), host.into()))
            }
        }
    }

    /// Create a new user prefix from nick, user, and host components.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Whether this prefix names a server.
    pub fn is_server(&self) -> bool {
        matches!(self, Prefix::ServerName(_))
    }

    /// Get the nickname if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Get the username if this is a user prefix.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, user, _) if !user.is_empty() => Some(user),
            _ => None,
        }
    }

    /// Get the hostname of a user prefix.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}
