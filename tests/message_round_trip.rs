//! Integration tests for message parsing and serialization
//!
//! These tests verify that messages can be parsed from strings and then
//! serialized back to equivalent strings, ensuring round-trip compatibility.

use lip_irc::{Command, Message, MessageParseError, Prefix, ProtocolError, Response};

fn round_trip(original: &str) -> Message {
    let message: Message = original.parse().expect("Failed to parse message");
    let serialized = message.to_string();
    let reparsed: Message = serialized.parse().expect("Failed to reparse message");
    assert_eq!(message, reparsed);
    message
}

#[test]
fn test_message_round_trip_simple() {
    let message = round_trip("PING :irc.example.com");
    assert_eq!(message.command, Command::PING);
    assert_eq!(message.params, vec!["irc.example.com"]);
}

#[test]
fn test_message_round_trip_with_prefix() {
    let message = round_trip(":nick!user@host PRIVMSG #channel :Hello, world!");
    assert_eq!(message.prefix.as_deref(), Some("nick!user@host"));
    assert_eq!(message.to_string(), ":nick!user@host PRIVMSG #channel :Hello, world!");
}

#[test]
fn test_message_round_trip_numeric_response() {
    let message = round_trip(":server 001 nickname :Welcome to the IRC Network");
    assert_eq!(message.command.response(), Some(Response::RPL_WELCOME));
    assert_eq!(message.to_string(), ":server 001 nickname :Welcome to the IRC Network");
}

#[test]
fn test_message_round_trip_names_reply() {
    let message = round_trip(":irc.example 353 me = #chat :@alice +bob carol");
    assert_eq!(message.params, vec!["me", "=", "#chat", "@alice +bob carol"]);
}

#[test]
fn test_message_round_trip_unknown_command() {
    let message = round_trip(":irc.example CAP * LS :multi-prefix");
    assert_eq!(message.command, Command::Raw("CAP".into()));
}

#[test]
fn test_message_round_trip_empty_trailing() {
    let message = round_trip("PRIVMSG #chan :");
    assert_eq!(message.params, vec!["#chan", ""]);
    assert_eq!(message.to_string(), "PRIVMSG #chan :");
}

#[test]
fn test_trailing_colon_kept_inside_text() {
    let message = round_trip(":a!b@c PRIVMSG #chan ::-) hi");
    assert_eq!(message.params[1], ":-) hi");
}

#[test]
fn test_prefix_of_parsed_message() {
    let message: Message = ":alice!a@host JOIN #chat".parse().unwrap();
    assert_eq!(
        message.source().unwrap(),
        Prefix::new("alice", "a", "host")
    );

    let message: Message = ":irc.example.net NOTICE * :hello".parse().unwrap();
    assert!(message.source().unwrap().is_server());
}

#[test]
fn test_constructed_messages_serialize() {
    assert_eq!(Message::join("#rust").to_string(), "JOIN #rust");
    assert_eq!(Message::nick("me").to_string(), "NICK me");
    assert_eq!(Message::user("me", "Me Myself").to_string(), "USER me 0 * :Me Myself");
    assert_eq!(Message::privmsg("#rust", "hi").to_string(), "PRIVMSG #rust :hi");
    assert_eq!(Message::pong("irc.example", None).to_string(), "PONG :irc.example");
    assert_eq!(Message::quit(None).to_string(), "QUIT");
}

#[test]
fn test_malformed_lines_are_rejected() {
    for (line, cause) in [
        ("", MessageParseError::EmptyMessage),
        (":", MessageParseError::InvalidPrefix),
        (":prefix 12 foo", MessageParseError::InvalidCommand("12".into())),
        ("PING a  b", MessageParseError::EmptyParameter { position: 7 }),
    ] {
        match line.parse::<Message>() {
            Err(ProtocolError::InvalidMessage { string, cause: got }) => {
                assert_eq!(string, line);
                assert_eq!(got, cause, "line {:?}", line);
            }
            other => panic!("expected a parse error for {:?}, got {:?}", line, other),
        }
    }
}
