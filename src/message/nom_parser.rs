//! Nom-based IRC message parser.
//!
//! Parses one framed line (terminator already stripped) into borrowed
//! components. Single spaces delimit tokens. The command is exactly three
//! ASCII digits or a run of ASCII letters. A doubled delimiter in the
//! middle parameters is an error rather than being skipped.
//!
//! IRC message format:
//! ```text
//! [:prefix ]<command>[ param]*[ :trailing]
//! ```

use nom::{
    branch::alt,
    bytes::complete::{take_while1, take_while_m_n},
    character::complete::char,
    combinator::{eof, peek, recognize},
    error::context,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::MessageParseError;

/// Parse message prefix (the part after `:`), consuming the single space
/// that must follow it.
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    context(
        "parsing message prefix",
        terminated(preceded(char(':'), take_while1(|c| c != ' ')), char(' ')),
    )(input)
}

/// A command token ends at a space or at the end of the line.
fn command_end(input: &str) -> IResult<&str, &str> {
    peek(alt((recognize(char(' ')), eof)))(input)
}

/// Parse the command: three digits or one-or-more ASCII letters.
fn parse_command(input: &str) -> IResult<&str, &str> {
    context(
        "parsing IRC command",
        terminated(
            alt((
                take_while_m_n(3, 3, |c: char| c.is_ascii_digit()),
                take_while1(|c: char| c.is_ascii_alphabetic()),
            )),
            command_end,
        ),
    )(input)
}

/// A parsed IRC message with borrowed string slices.
///
/// This is the intermediate representation produced by the nom parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command token.
    pub command: &'a str,
    /// Command parameters, including trailing.
    pub params: Vec<&'a str>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse one line into a `ParsedMessage`.
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        if line.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let (rest, prefix) = if line.starts_with(':') {
            let (rest, prefix) =
                parse_prefix(line).map_err(|_| MessageParseError::InvalidPrefix)?;
            (rest, Some(prefix))
        } else {
            (line, None)
        };

        let (mut rest, command) = parse_command(rest).map_err(|_| {
            let token = rest.split_once(' ').map_or(rest, |(token, _)| token);
            MessageParseError::InvalidCommand(token.to_owned())
        })?;

        let mut params = Vec::new();
        while let Some(after) = rest.strip_prefix(' ') {
            if let Some(trailing) = after.strip_prefix(':') {
                params.push(trailing);
                break;
            }
            if after.starts_with(' ') {
                return Err(MessageParseError::EmptyParameter {
                    position: line.len() - after.len(),
                });
            }
            let end = after.find(' ').unwrap_or(after.len());
            if end > 0 {
                params.push(&after[..end]);
            }
            rest = &after[end..];
        }

        Ok(ParsedMessage {
            prefix,
            command,
            params,
        })
    }
}
