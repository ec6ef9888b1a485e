//! Property-based tests for the protocol engine.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Serialized messages can be re-parsed (roundtrip)
//! 2. Line framing does not depend on how the stream is chunked
//! 3. Wire markup decodes into the runs the user styled

use proptest::prelude::*;
use lip_irc::markup::{decode, encode_archive, encode_wire, Marker, StyleState, StyledRun};
use lip_irc::{Command, LineFramer, Message, Prefix};

// =============================================================================
// STRATEGIES - Generators for valid IRC components
// =============================================================================

/// Valid IRC nickname: starts with letter or special char, followed by
/// letters, digits, or special chars.
fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

/// Valid IRC username (ident): alphanumeric, no spaces or @ or !
fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

/// Valid hostname: simplified version
fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

/// Valid IRC channel name: starts with # or &, followed by valid chars
fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&][a-zA-Z0-9_\\-]{1,49}").expect("valid regex")
}

/// Message text that doesn't contain CR/LF (which would break IRC protocol)
fn message_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex")
}

/// Generate a valid prefix string
fn prefix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Server name (contains dot)
        prop::string::string_regex("[a-z]+\\.[a-z]+\\.[a-z]+").expect("valid regex"),
        // User prefix: nick!user@host
        (nickname_strategy(), username_strategy(), hostname_strategy())
            .prop_map(|(nick, user, host)| Prefix::new(nick, user, host).to_string()),
    ]
}

/// Generate commands with their parameters
fn command_strategy() -> impl Strategy<Value = (Command, Vec<String>)> {
    prop_oneof![
        (channel_strategy(), message_text_strategy())
            .prop_map(|(target, text)| (Command::PRIVMSG, vec![target, text])),
        (channel_strategy(), message_text_strategy())
            .prop_map(|(target, text)| (Command::NOTICE, vec![target, text])),
        nickname_strategy().prop_map(|nick| (Command::NICK, vec![nick])),
        channel_strategy().prop_map(|chan| (Command::JOIN, vec![chan])),
        (channel_strategy(), prop::option::of(message_text_strategy()))
            .prop_map(|(chan, msg)| (Command::PART, std::iter::once(chan).chain(msg).collect())),
        hostname_strategy().prop_map(|server| (Command::PING, vec![server])),
        hostname_strategy().prop_map(|server| (Command::PONG, vec![server])),
        prop::option::of(message_text_strategy())
            .prop_map(|reason| (Command::QUIT, reason.into_iter().collect())),
        (1u16..1000, nickname_strategy(), message_text_strategy())
            .prop_map(|(code, nick, text)| (Command::Numeric(code), vec![nick, text])),
    ]
}

/// Generate a complete valid Message
fn message_strategy() -> impl Strategy<Value = Message> {
    (prop::option::of(prefix_strategy()), command_strategy()).prop_map(
        |(prefix, (command, params))| Message {
            prefix,
            command,
            params,
        },
    )
}

/// Lines without terminators or NUL, short enough for the default buffer.
fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("[^\r\n\0]{0,100}").expect("valid regex"),
        0..20,
    )
}

/// One piece of user-styled text.
#[derive(Clone, Debug)]
enum Styled {
    Word(String),
    Marker(Marker),
    /// A color glyph with no digits, a foreground, or both colors.
    Color(Option<(u8, Option<u8>)>),
}

/// Styled text as a piece list. Words carry no digits or commas, so color
/// digits never run into them.
fn styled_strategy() -> impl Strategy<Value = Vec<Styled>> {
    let toggles = vec![
        Marker::Bold,
        Marker::Italic,
        Marker::Underline,
        Marker::Reset,
        Marker::Hide,
    ];
    let piece = prop_oneof![
        prop::string::string_regex("[a-zA-Z .!?]{1,10}")
            .expect("valid regex")
            .prop_map(Styled::Word),
        prop::sample::select(toggles).prop_map(Styled::Marker),
        prop::option::of((0u8..16, prop::option::of(0u8..16))).prop_map(Styled::Color),
    ];
    prop::collection::vec(piece, 0..20)
}

/// Glyph text for a piece list. Color indexes are written with two digits.
fn glyph_text(pieces: &[Styled]) -> String {
    let mut text = String::new();
    for piece in pieces {
        match piece {
            Styled::Word(word) => text.push_str(word),
            Styled::Marker(marker) => text.push(marker.glyph()),
            Styled::Color(colors) => {
                text.push(Marker::Color.glyph());
                if let Some((fg, bg)) = colors {
                    text.push_str(&format!("{:02}", fg));
                    if let Some(bg) = bg {
                        text.push_str(&format!(",{:02}", bg));
                    }
                }
            }
        }
    }
    text
}

/// Runs the user meant: style accumulated over the pieces, with a new run
/// wherever a wire marker sits between words. Hide markers change nothing.
fn expected_runs(pieces: &[Styled]) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut style = StyleState::default();
    let mut current = String::new();
    for piece in pieces {
        if let Styled::Word(word) = piece {
            current.push_str(word);
            continue;
        }
        if matches!(piece, Styled::Marker(Marker::Hide)) {
            continue;
        }
        if !current.is_empty() {
            runs.push(StyledRun {
                text: std::mem::take(&mut current),
                style,
                tag: None,
            });
        }
        match piece {
            Styled::Marker(Marker::Bold) => style.bold = !style.bold,
            Styled::Marker(Marker::Italic) => style.italic = !style.italic,
            Styled::Marker(Marker::Underline) => style.underline = !style.underline,
            Styled::Marker(Marker::Reset) => style = StyleState::default(),
            Styled::Color(None) => {
                style.fg = None;
                style.bg = None;
            }
            Styled::Color(Some((fg, bg))) => {
                style.fg = Some(*fg);
                if bg.is_some() {
                    style.bg = *bg;
                }
            }
            Styled::Marker(_) | Styled::Word(_) => {}
        }
    }
    if !current.is_empty() {
        runs.push(StyledRun {
            text: current,
            style,
            tag: None,
        });
    }
    runs
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The fundamental roundtrip property: parse → serialize → parse = identity
    #[test]
    fn message_roundtrip(msg in message_strategy()) {
        let serialized = msg.to_string();
        let parsed: Message = serialized.parse()
            .expect("Serialized message should be parseable");
        prop_assert_eq!(&msg, &parsed,
            "Roundtrip failed for serialized: {}", serialized);
    }

    /// Nickname parser extracts correct nick from full prefix
    #[test]
    fn source_nickname_extraction(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy()
    ) {
        let prefix = format!("{}!{}@{}", nick, user, host);
        let msg = Message::new(Some(prefix.as_str()), Command::PING, ["test"]);
        prop_assert_eq!(msg.source_nickname(), Some(nick));
    }

    /// Feeding a stream in one chunk or in arbitrary pieces yields the same
    /// lines in the same order.
    #[test]
    fn framing_ignores_chunking(lines in lines_strategy(), chunk in 1usize..64) {
        let stream: Vec<u8> = lines
            .iter()
            .flat_map(|line| line.bytes().chain(*b"\r\n"))
            .collect();

        let mut whole = LineFramer::new();
        let at_once = whole.feed(&stream).expect("stream should frame");

        let mut pieces = LineFramer::new();
        let mut chunked = Vec::new();
        for part in stream.chunks(chunk) {
            chunked.extend(pieces.feed(part).expect("chunk should frame"));
        }

        prop_assert_eq!(&at_once, &lines);
        prop_assert_eq!(&chunked, &lines);
        prop_assert!(whole.pending().is_empty());
    }

    /// Sending styled text and decoding it gives back the same text split
    /// into the same styled runs.
    #[test]
    fn wire_markup_keeps_styled_runs(pieces in styled_strategy()) {
        let runs = decode(&encode_wire(&glyph_text(&pieces)), None);
        prop_assert_eq!(&runs, &expected_runs(&pieces));
        prop_assert!(runs.iter().all(|run| !run.text.is_empty()));
    }

    /// The archive form never contains hidden text.
    #[test]
    fn archive_markup_drops_hidden_text(
        before in "[a-z ]{0,10}",
        hidden in "[A-Z]{1,10}",
        after in "[a-z ]{0,10}"
    ) {
        let hide = Marker::Hide.glyph();
        let text = format!("{}{}{}{}{}", before, hide, hidden, hide, after);
        let archived = encode_archive(&text);
        prop_assert_eq!(archived, format!("{}{}{}", before, hide, after));
        prop_assert_eq!(encode_wire(&text), format!("{}{}{}", before, hidden, after));
    }
}
