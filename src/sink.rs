//! Display and archive collaborators.
//!
//! The engine renders every line it shows into a [`DisplayLine`] and hands
//! it to a [`DisplaySink`]. Lines filed under a channel are also offered to
//! an [`ArchiveSink`] as an [`ArchiveRecord`]. Archiving is best effort:
//! failures are logged and never reach the connection.

use std::io::{BufRead, Write};

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;
use crate::markup::{StyledRun, Tag};

/// Where a display line goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window<'a> {
    /// The global console.
    Console,
    /// A channel or private conversation.
    Channel {
        /// Case-fold key.
        key: &'a str,
        /// Name as first seen.
        name: &'a str,
    },
}

/// One rendered line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLine {
    /// When the line was rendered.
    pub time: DateTime<Local>,
    /// Sender nick, for chat messages.
    pub from: Option<String>,
    /// Semantic tag of the whole line.
    pub tag: Option<Tag>,
    /// Styled text.
    pub runs: Vec<StyledRun>,
    /// The local date changed since the previous line in the same window.
    pub new_day: bool,
}

impl DisplayLine {
    /// Text of the line without style.
    pub fn plain_text(&self) -> String {
        crate::markup::plain_text(&self.runs)
    }
}

/// Receives rendered lines.
pub trait DisplaySink {
    /// Show a line in a window.
    fn line(&mut self, window: Window<'_>, line: &DisplayLine);

    /// Update the application title.
    fn set_title(&mut self, _title: &str) {}
}

/// Durable record of a channel line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Channel key.
    pub channel: String,
    /// Unix time in seconds.
    pub time: i64,
    /// Sender nick.
    pub from: Option<String>,
    /// Semantic tag.
    pub tag: Option<Tag>,
    /// Archive-encoded text.
    pub text: String,
}

impl ArchiveRecord {
    /// Local time of the record, if representable.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.time, 0).single()
    }
}

/// Stores channel lines for later replay.
pub trait ArchiveSink {
    /// Store one record.
    fn record(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError>;
}

impl<A: ArchiveSink + ?Sized> ArchiveSink for Box<A> {
    fn record(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        (**self).record(record)
    }
}

/// Archive that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullArchive;

impl ArchiveSink for NullArchive {
    fn record(&mut self, _record: &ArchiveRecord) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// Archive writing one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesArchive<W> {
    writer: W,
}

impl<W: Write> JsonLinesArchive<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// The wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ArchiveSink for JsonLinesArchive<W> {
    fn record(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Read archived records back, skipping blank lines.
pub fn replay_archive<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<ArchiveRecord, ArchiveError>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(ArchiveError::from)),
        Err(e) => Some(Err(ArchiveError::from(e))),
    })
}

/// Display sink keeping every line in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryDisplay {
    /// Lines with the key of their channel, `None` for the console.
    pub lines: Vec<(Option<String>, DisplayLine)>,
    /// Last title set.
    pub title: Option<String>,
}

impl MemoryDisplay {
    /// Plain text of the lines shown in a channel (`Some(key)`) or the
    /// console (`None`).
    pub fn texts(&self, window: Option<&str>) -> Vec<String> {
        self.lines
            .iter()
            .filter(|(key, _)| key.as_deref() == window)
            .map(|(_, line)| line.plain_text())
            .collect()
    }
}

impl DisplaySink for MemoryDisplay {
    fn line(&mut self, window: Window<'_>, line: &DisplayLine) {
        let key = match window {
            Window::Console => None,
            Window::Channel { key, .. } => Some(key.to_owned()),
        };
        self.lines.push((key, line.clone()));
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> ArchiveRecord {
        ArchiveRecord {
            channel: "#chat".into(),
            time: 1_700_000_000,
            from: Some("alice".into()),
            tag: Some(Tag::Theirs),
            text: text.into(),
        }
    }

    #[test]
    fn test_json_lines_format() {
        let mut archive = JsonLinesArchive::new(Vec::new());
        archive.record(&record("hi")).unwrap();
        let out = String::from_utf8(archive.into_inner()).unwrap();
        assert_eq!(
            out,
            "{\"channel\":\"#chat\",\"time\":1700000000,\"from\":\"alice\",\"tag\":\"theirs\",\"text\":\"hi\"}\n"
        );
    }

    #[test]
    fn test_replay() {
        let mut archive = JsonLinesArchive::new(Vec::new());
        archive.record(&record("one")).unwrap();
        archive.record(&record("two \x02bold\x02")).unwrap();
        let bytes = archive.into_inner();

        let records: Vec<ArchiveRecord> = replay_archive(&bytes[..])
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records, vec![record("one"), record("two \x02bold\x02")]);
        assert!(records[0].local_time().is_some());
    }

    #[test]
    fn test_replay_reports_garbage() {
        let input = b"{\"channel\":\"#a\"\n\n";
        let results: Vec<_> = replay_archive(&input[..]).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ArchiveError::Json(_))));
    }
}
