use crate::command::Command;
use crate::error::HandlerError;
use crate::prefix::Prefix;

/// An owned IRC message.
///
/// The prefix is kept as raw text: whether it names a valid user is a
/// question for the handler that needs a sender, not for the grammar.
///
/// # Example
///
/// ```
/// use lip_irc::{Command, Message};
///
/// // Parse a message
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.command, Command::PRIVMSG);
///
/// // Construct a message
/// let msg = Message::privmsg("#channel", "Hello!");
/// assert_eq!(msg.to_string(), "PRIVMSG #channel :Hello!");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message prefix/source (e.g., `nick!user@host`), without the `:`.
    pub prefix: Option<String>,
    /// The IRC command.
    pub command: Command,
    /// Ordered parameters; only the last may contain spaces.
    pub params: Vec<String>,
}

impl Message {
    /// Create a new message from raw components.
    #[must_use]
    pub fn new<I, S>(prefix: Option<&str>, command: Command, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Message {
            prefix: prefix.map(str::to_owned),
            command,
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    fn outbound(command: Command, params: Vec<String>) -> Self {
        Message {
            prefix: None,
            command,
            params,
        }
    }

    /// Parse the prefix as a user or server source.
    pub fn source(&self) -> Result<Prefix, HandlerError> {
        let prefix = self.prefix.as_deref().ok_or(HandlerError::MissingPrefix)?;
        Prefix::parse(prefix)
    }

    /// Parse the prefix and require it to name a user.
    pub fn user_source(&self) -> Result<Prefix, HandlerError> {
        let source = self.source()?;
        if source.is_server() {
            return Err(HandlerError::ServerPrefix(source.to_string()));
        }
        Ok(source)
    }

    /// Get the nickname from the message prefix, if present and valid.
    pub fn source_nickname(&self) -> Option<String> {
        self.user_source()
            .ok()
            .and_then(|p| p.nick().map(str::to_owned))
    }

    /// Create a PRIVMSG message to a target with text
    #[must_use]
    pub fn privmsg<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Message::outbound(Command::PRIVMSG, vec![target.into(), text.into()])
    }

    /// Create a NOTICE message to a target with text
    #[must_use]
    pub fn notice<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Message::outbound(Command::NOTICE, vec![target.into(), text.into()])
    }

    /// Create a JOIN message for a channel
    #[must_use]
    pub fn join<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Message::outbound(Command::JOIN, vec![channel.into()])
    }

    /// Create a NICK message to change nickname
    #[must_use]
    pub fn nick<N>(nickname: N) -> Self
    where
        N: Into<String>,
    {
        Message::outbound(Command::NICK, vec![nickname.into()])
    }

    /// Create a USER registration message: `USER <nick> 0 * :<fullname>`.
    #[must_use]
    pub fn user<U, R>(username: U, realname: R) -> Self
    where
        U: Into<String>,
        R: Into<String>,
    {
        Message::outbound(
            Command::USER,
            vec![username.into(), "0".into(), "*".into(), realname.into()],
        )
    }

    /// Answer a PING carrying `server1` and an optional `server2`.
    #[must_use]
    pub fn pong<S>(server1: S, server2: Option<String>) -> Self
    where
        S: Into<String>,
    {
        let mut params = vec![server1.into()];
        params.extend(server2);
        Message::outbound(Command::PONG, params)
    }

    /// Leave `channel`.
    pub fn part<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Message::outbound(Command::PART, vec![channel.into()])
    }

    /// Create a QUIT message with an optional reason
    #[must_use]
    pub fn quit(reason: Option<String>) -> Self {
        Message::outbound(Command::QUIT, reason.into_iter().collect())
    }

    /// CTCP VERSION answer for `target`: `NOTICE target :\x01VERSION :<app> <version>\x01`.
    #[must_use]
    pub fn ctcp_version_reply<T>(target: T, app: &str, version: &str) -> Self
    where
        T: Into<String>,
    {
        Message::notice(target, format!("\x01VERSION :{} {}\x01", app, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_forms() {
        assert_eq!(Message::nick("me").to_string(), "NICK me");
        assert_eq!(Message::user("me", "Me Myself").to_string(), "USER me 0 * :Me Myself");
        assert_eq!(Message::user("me", "Me").to_string(), "USER me 0 * :Me");
        assert_eq!(Message::join("#chat").to_string(), "JOIN #chat");
        assert_eq!(Message::privmsg("#chat", "hi").to_string(), "PRIVMSG #chat :hi");
        assert_eq!(Message::pong("server1", None).to_string(), "PONG :server1");
        assert_eq!(
            Message::pong("server1", Some("server2".into())).to_string(),
            "PONG server1 :server2"
        );
        assert_eq!(Message::quit(None).to_string(), "QUIT");
        assert_eq!(Message::part("#chat").to_string(), "PART #chat");
    }

    #[test]
    fn test_ctcp_version_reply() {
        let msg = Message::ctcp_version_reply("alice", "Lip", "0.1.0");
        assert_eq!(msg.to_string(), "NOTICE alice :\x01VERSION :Lip 0.1.0\x01");
    }

    #[test]
    fn test_sources() {
        let msg: Message = ":alice!a@host PRIVMSG #chat :hi".parse().unwrap();
        assert_eq!(msg.source_nickname().as_deref(), Some("alice"));

        let msg: Message = ":irc.example.net PRIVMSG #chat :hi".parse().unwrap();
        assert!(matches!(msg.user_source(), Err(HandlerError::ServerPrefix(_))));

        let msg: Message = "PRIVMSG #chat :hi".parse().unwrap();
        assert_eq!(msg.source(), Err(HandlerError::MissingPrefix));
    }

    #[test]
    fn test_numeric_serialization() {
        let msg = Message::new(Some("irc.example"), Command::Numeric(1), ["me", "Welcome home"]);
        assert_eq!(msg.to_string(), ":irc.example 001 me :Welcome home");
    }
}
