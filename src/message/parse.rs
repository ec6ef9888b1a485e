//! Message parsing implementation.
//!
//! This module implements `FromStr` for `Message` using the nom-based parser.

use std::str::FromStr;

use crate::command::Command;
use crate::error::ProtocolError;

use super::nom_parser::ParsedMessage;
use super::types::Message;

impl<'a> From<ParsedMessage<'a>> for Message {
    fn from(parsed: ParsedMessage<'a>) -> Self {
        let command = match parsed.command.parse() {
            Ok(command) => command,
            Err(never) => match never {},
        };
        Message {
            prefix: parsed.prefix.map(str::to_owned),
            command,
            params: parsed.params.into_iter().map(str::to_owned).collect(),
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        ParsedMessage::parse(s)
            .map(Message::from)
            .map_err(|cause| ProtocolError::InvalidMessage {
                string: s.to_owned(),
                cause,
            })
    }
}
