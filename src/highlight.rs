//! Nick and URL highlighting.
//!
//! Both passes scan a text for non-overlapping spans and wrap each span in
//! a pair of toggle control bytes: bold for nick mentions, underline for
//! URLs. The URL pass runs over the output of the nick pass, so a bold
//! toggle inside a candidate URL ends it.

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::casemap::irc_to_lower;
use crate::markup::Marker;

/// What a highlight span marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    /// A mention of a channel member.
    Nick,
    /// A web address.
    Url,
}

/// Byte range of a highlighted stretch of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Start offset, inclusive.
    pub start: usize,
    /// End offset, exclusive.
    pub end: usize,
    /// Span kind.
    pub kind: SpanKind,
}

impl SpanKind {
    fn marker(self) -> char {
        let marker = match self {
            SpanKind::Nick => Marker::Bold,
            SpanKind::Url => Marker::Underline,
        };
        marker.control().unwrap_or_default()
    }
}

/// Find mentions of `nicks` in `text`.
///
/// Matching is case-insensitive under IRC case folding. A mention must not
/// be followed by a letter or digit. At each position the longest matching
/// nick wins; unmatched text is skipped one grapheme at a time.
pub fn find_nicks<I, S>(text: &str, nicks: I) -> Vec<HighlightSpan>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut nicks: Vec<String> = nicks
        .into_iter()
        .map(|n| irc_to_lower(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect();
    nicks.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    // Folding maps ASCII to ASCII, so offsets in `folded` are offsets in `text`.
    let folded = irc_to_lower(text);
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < folded.len() {
        let rest = &folded[pos..];
        let hit = nicks.iter().find(|nick| {
            rest.starts_with(nick.as_str())
                && rest[nick.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
        });
        if let Some(nick) = hit {
            spans.push(HighlightSpan {
                start: pos,
                end: pos + nick.len(),
                kind: SpanKind::Nick,
            });
            pos += nick.len();
            continue;
        }
        pos += rest.graphemes(true).next().map_or(1, str::len);
    }
    spans
}

/// Whether the URL candidate ends here.
///
/// Trailing punctuation is only part of a URL when more URL text follows
/// it, as in `http://example.com/a.b` versus `see http://example.com.`
fn at_final_jam(s: &str) -> bool {
    for c in s.chars() {
        match c {
            ' ' | '<' | '>' => return true,
            ')' | '.' | ',' | ':' | ';' | '!' | '?' | '"' | '\'' => continue,
            c if !c.is_ascii() => match get_general_category(c) {
                GeneralCategory::Surrogate
                | GeneralCategory::ConnectorPunctuation
                | GeneralCategory::DashPunctuation
                | GeneralCategory::ClosePunctuation
                | GeneralCategory::FinalPunctuation
                | GeneralCategory::InitialPunctuation
                | GeneralCategory::OtherPunctuation
                | GeneralCategory::OpenPunctuation
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
                | GeneralCategory::SpaceSeparator => continue,
                _ => return false,
            },
            c => return c.is_ascii_control(),
        }
    }
    true
}

/// Length of a URL candidate at the start of `s`, if it has a web scheme.
fn skip_url(s: &str) -> Option<usize> {
    let after = ["http://", "https://"]
        .iter()
        .find_map(|scheme| s.strip_prefix(scheme))?;
    let mut end = s.len() - after.len();
    while !at_final_jam(&s[end..]) {
        end += s[end..].graphemes(true).next().map_or(0, str::len);
    }
    Some(end)
}

fn is_word_char(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::LowercaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::UppercaseLetter
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
            | GeneralCategory::NonspacingMark
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
            | GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
    )
}

/// Bytes up to and including the first character after a word run.
fn skip_word(s: &str) -> usize {
    let mut len = 0;
    for c in s.chars() {
        len += c.len_utf8();
        if !is_word_char(c) {
            break;
        }
    }
    len
}

/// Find `http://` and `https://` URLs in `text`.
///
/// A candidate only counts if it parses as an absolute URL.
pub fn find_urls(text: &str) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        if let Some(len) = skip_url(rest) {
            if Url::parse(&rest[..len]).is_ok() {
                spans.push(HighlightSpan {
                    start: pos,
                    end: pos + len,
                    kind: SpanKind::Url,
                });
                pos += len;
                continue;
            }
        }
        pos += skip_word(rest);
    }
    spans
}

/// Insert the span kind's toggle byte at every span start and end.
///
/// Spans must be sorted and must not overlap.
pub fn insert_markers(text: &str, spans: &[HighlightSpan]) -> String {
    let mut out = String::with_capacity(text.len() + 2 * spans.len());
    let mut last = 0;
    for span in spans {
        let marker = span.kind.marker();
        out.push_str(&text[last..span.start]);
        out.push(marker);
        out.push_str(&text[span.start..span.end]);
        out.push(marker);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Run the nick pass and then the URL pass over `text`.
///
/// ```
/// use lip_irc::highlight::highlight;
///
/// let out = highlight("alice: see https://example.com/x.", ["alice"]);
/// assert_eq!(out, "\x02alice\x02: see \x1Fhttps://example.com/x\x1F.");
/// ```
pub fn highlight<I, S>(text: &str, nicks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let with_nicks = insert_markers(text, &find_nicks(text, nicks));
    insert_markers(&with_nicks, &find_urls(&with_nicks))
}
