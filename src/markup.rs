//! Text style markup.
//!
//! Text typed by the user carries style markers as private-use sentinel
//! glyphs, one per [`Marker`]. On the wire each marker (except hide) is a
//! single control byte:
//!
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color (followed by optional foreground,background)
//! - 0x0F (^O): Reset all formatting
//! - 0x1D (^]): Italic
//! - 0x1F (^_): Underline
//!
//! Hide has no wire byte. [`encode_wire`] drops the hide markers and sends
//! the hidden text as plain text, while [`encode_archive`] keeps only a
//! placeholder glyph and drops the hidden text from one's own archive.
//! [`decode`] folds wire text back into [`StyledRun`]s for display.

use std::iter::Peekable;
use std::str::Chars;

use serde::{Deserialize, Serialize};

/// A style marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Toggle bold.
    Bold,
    /// Toggle italic.
    Italic,
    /// Toggle underline.
    Underline,
    /// Back to plain text.
    Reset,
    /// Select colors; digits follow on the wire.
    Color,
    /// Delimit a span hidden from the archive.
    Hide,
}

const HIDE_GLYPH: char = '\u{E000}';

impl Marker {
    /// All markers.
    pub const ALL: [Marker; 6] = [
        Marker::Bold,
        Marker::Italic,
        Marker::Underline,
        Marker::Reset,
        Marker::Color,
        Marker::Hide,
    ];

    /// Wire control byte, if the marker has one.
    pub const fn control(self) -> Option<char> {
        match self {
            Marker::Bold => Some('\x02'),
            Marker::Color => Some('\x03'),
            Marker::Reset => Some('\x0F'),
            Marker::Italic => Some('\x1D'),
            Marker::Underline => Some('\x1F'),
            Marker::Hide => None,
        }
    }

    /// Sentinel glyph representing the marker in editable text.
    ///
    /// Glyphs sit in the private use area at U+E000 plus the control byte.
    pub const fn glyph(self) -> char {
        match self {
            Marker::Bold => '\u{E002}',
            Marker::Color => '\u{E003}',
            Marker::Reset => '\u{E00F}',
            Marker::Italic => '\u{E01D}',
            Marker::Underline => '\u{E01F}',
            Marker::Hide => HIDE_GLYPH,
        }
    }

    /// Marker for a sentinel glyph.
    pub fn from_glyph(c: char) -> Option<Marker> {
        Marker::ALL.into_iter().find(|m| m.glyph() == c)
    }

    /// Marker for a wire control byte.
    pub fn from_control(c: char) -> Option<Marker> {
        Marker::ALL.into_iter().find(|m| m.control() == Some(c))
    }
}

/// Semantic tag of a displayed line, composed with its style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Sent by the local user.
    Mine,
    /// Received from someone else.
    Theirs,
    /// Client or server notice.
    Log,
    /// Error-grade notice.
    Error,
}

impl Tag {
    /// Name of the tag as stored in the archive.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Mine => "mine",
            Tag::Theirs => "theirs",
            Tag::Log => "log",
            Tag::Error => "error",
        }
    }
}

/// Accumulated text style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleState {
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Underlined text.
    pub underline: bool,
    /// Foreground color index, 0-15.
    pub fg: Option<u8>,
    /// Background color index, 0-15.
    pub bg: Option<u8>,
}

impl StyleState {
    /// Whether this is the plain default style.
    pub fn is_plain(&self) -> bool {
        *self == StyleState::default()
    }
}

/// A stretch of text rendered with one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    /// The literal text.
    pub text: String,
    /// Style accumulated from the control bytes before it.
    pub style: StyleState,
    /// Caller-supplied semantic tag.
    pub tag: Option<Tag>,
}

/// Replace marker glyphs with wire control bytes.
///
/// Hide markers are dropped; the text between them is kept.
pub fn encode_wire(text: &str) -> String {
    text.chars()
        .filter_map(|c| match Marker::from_glyph(c) {
            Some(marker) => marker.control(),
            None => Some(c),
        })
        .collect()
}

/// Replace marker glyphs with control bytes for the local archive.
///
/// A hide span keeps its opening glyph as a placeholder and loses
/// everything up to and including the closing glyph. An unterminated
/// span hides the rest of the text.
pub fn encode_archive(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match Marker::from_glyph(c) {
            Some(Marker::Hide) => {
                out.push(HIDE_GLYPH);
                for hidden in chars.by_ref() {
                    if hidden == HIDE_GLYPH {
                        break;
                    }
                }
            }
            Some(marker) => out.extend(marker.control()),
            None => out.push(c),
        }
    }
    out
}

/// Parse one color index: one digit, or two digits when the value is at
/// most 15.
fn take_color(chars: &mut Peekable<Chars<'_>>) -> Option<u8> {
    let first = chars.peek()?.to_digit(10)? as u8;
    chars.next();
    if let Some(second) = chars.peek().and_then(|c| c.to_digit(10)) {
        let value = first * 10 + second as u8;
        if value <= 15 {
            chars.next();
            return Some(value);
        }
    }
    Some(first)
}

fn apply_color(style: &mut StyleState, chars: &mut Peekable<Chars<'_>>) {
    let Some(fg) = take_color(chars) else {
        style.fg = None;
        style.bg = None;
        return;
    };
    style.fg = Some(fg);

    let mut ahead = chars.clone();
    if ahead.next() == Some(',') && ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        style.bg = take_color(chars);
    }
}

/// Fold wire text into styled runs.
///
/// Control bytes toggle bold, italic and underline, select colors, or
/// reset everything. Literal text between them becomes a run carrying the
/// accumulated style and `tag`. Empty runs are not emitted.
///
/// ```
/// use lip_irc::markup::{decode, Tag};
///
/// let runs = decode("a \x02bold\x02 b", Some(Tag::Theirs));
/// assert_eq!(runs.len(), 3);
/// assert!(runs[1].style.bold);
/// assert_eq!(runs[1].text, "bold");
/// ```
pub fn decode(text: &str, tag: Option<Tag>) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut style = StyleState::default();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let Some(marker) = Marker::from_control(c) else {
            current.push(c);
            continue;
        };

        if !current.is_empty() {
            runs.push(StyledRun {
                text: std::mem::take(&mut current),
                style,
                tag,
            });
        }

        match marker {
            Marker::Bold => style.bold = !style.bold,
            Marker::Italic => style.italic = !style.italic,
            Marker::Underline => style.underline = !style.underline,
            Marker::Reset => style = StyleState::default(),
            Marker::Color => apply_color(&mut style, &mut chars),
            Marker::Hide => {}
        }
    }

    if !current.is_empty() {
        runs.push(StyledRun {
            text: current,
            style,
            tag,
        });
    }

    runs
}

/// Concatenate the text of styled runs, dropping all style.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}
