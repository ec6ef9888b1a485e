//! lip: a line-mode IRC client on top of the lip-irc engine.
//!
//! Lines typed on stdin are sent to the current window. Commands:
//!
//!   /join <#channel|nick>       open a window, joining channels
//!   /msg <target> <text>        send to a window and make it current
//!   /part [#channel|nick]       close a window, leaving channels
//!   /autojoin <#channel> on|off toggle auto-join
//!   /quit [reason]              leave the server

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use lip_irc::transport::{self, UserCommand};
use lip_irc::{
    ArchiveSink, DisplayLine, DisplaySink, JsonLinesArchive, NullArchive, Session, SessionConfig,
    StyledRun, Tag, Window,
};

#[derive(Parser)]
#[command(name = "lip", version, about = "Lip IRC client")]
struct Args {
    /// TOML configuration file
    #[arg(long, short, env = "LIP_CONFIG")]
    config: Option<PathBuf>,

    /// Nick to register with
    #[arg(long)]
    nick: Option<String>,

    /// Full name sent with USER
    #[arg(long)]
    name: Option<String>,

    /// IRC server host
    #[arg(long)]
    server: Option<String>,

    /// IRC server port
    #[arg(long)]
    port: Option<u16>,

    /// Force TLS on
    #[arg(long, conflicts_with = "no_tls")]
    tls: bool,

    /// Force TLS off
    #[arg(long)]
    no_tls: bool,

    /// Channel to join after the welcome (repeatable)
    #[arg(long = "join", short = 'j')]
    join: Vec<String>,

    /// Append channel lines to this JSON lines archive
    #[arg(long)]
    archive: Option<PathBuf>,
}

/// Settings read from the configuration file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    nick: Option<String>,
    name: Option<String>,
    server: Option<String>,
    port: Option<u16>,
    tls: Option<bool>,
    autojoin: Option<Vec<String>>,
    archive: Option<PathBuf>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("bad config file {}", path.display()))
    }
}

/// Merge command line over file over defaults.
fn resolve(args: &Args, file: FileConfig) -> Result<(SessionConfig, Option<PathBuf>)> {
    let nick = match args.nick.clone().or(file.nick) {
        Some(nick) => nick,
        None => bail!("no nick given; use --nick or set nick in the config file"),
    };
    let mut config = SessionConfig::new(nick);
    if let Some(name) = args.name.clone().or(file.name) {
        config.full_name = name;
    }
    if let Some(server) = args.server.clone().or(file.server) {
        config.server = server;
    }
    if let Some(port) = args.port.or(file.port) {
        config.port = port;
    }
    config.use_tls = if args.tls {
        true
    } else if args.no_tls {
        false
    } else {
        file.tls.unwrap_or(config.use_tls)
    };
    config.autojoin = file.autojoin.unwrap_or_default();
    for channel in &args.join {
        config.set_autojoin(channel, true);
    }
    config.validate()?;
    Ok((config, args.archive.clone().or(file.archive)))
}

/// Prints lines to stdout with ANSI styling.
struct Terminal;

fn sgr(run: &StyledRun) -> String {
    let mut codes = Vec::new();
    if run.style.bold {
        codes.push("1".to_owned());
    }
    if run.style.italic {
        codes.push("3".to_owned());
    }
    if run.style.underline {
        codes.push("4".to_owned());
    }
    if let Some(fg) = run.style.fg {
        codes.push(format!("38;5;{}", fg));
    }
    if let Some(bg) = run.style.bg {
        codes.push(format!("48;5;{}", bg));
    }
    match run.tag {
        Some(Tag::Error) if codes.is_empty() => codes.push("31".to_owned()),
        Some(Tag::Log) if codes.is_empty() => codes.push("2".to_owned()),
        _ => {}
    }
    if codes.is_empty() {
        String::new()
    } else {
        format!("\x1b[{}m", codes.join(";"))
    }
}

/// Write one display line with ANSI styling.
fn write_line<W: Write>(out: &mut W, window: Window<'_>, line: &DisplayLine) -> std::io::Result<()> {
    let label = match window {
        Window::Console => "*",
        Window::Channel { name, .. } => name,
    };
    if line.new_day {
        writeln!(out, "{} ({})", label, line.time.format("%Y-%m-%d"))?;
    }
    let mut text = format!("{} [{}] ", label, line.time.format("%R"));
    if let Some(from) = &line.from {
        text.push_str(&format!("<{}> ", from));
    }
    for run in &line.runs {
        let style = sgr(run);
        if style.is_empty() {
            text.push_str(&run.text);
        } else {
            text.push_str(&format!("{}{}\x1b[0m", style, run.text));
        }
    }
    writeln!(out, "{}", text)
}

impl DisplaySink for Terminal {
    fn line(&mut self, window: Window<'_>, line: &DisplayLine) {
        if let Err(e) = write_line(&mut std::io::stdout().lock(), window, line) {
            tracing::warn!(error = %e, "terminal write failed");
        }
    }

    fn set_title(&mut self, title: &str) {
        let mut out = std::io::stdout().lock();
        let written = write!(out, "\x1b]0;{}\x07", title).and_then(|()| out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "terminal title update failed");
        }
    }
}

/// Turn one input line into a command, tracking the current window.
fn parse_input(line: &str, current: &mut Option<String>) -> Option<UserCommand> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return match current {
            Some(target) => Some(UserCommand::Say {
                target: target.clone(),
                text: line.to_owned(),
            }),
            None => {
                eprintln!("no current window; use /join first");
                None
            }
        };
    };

    let (word, args) = rest.split_once(' ').unwrap_or((rest, ""));
    let args = args.trim();
    match word {
        "join" if !args.is_empty() => {
            *current = Some(args.to_owned());
            Some(UserCommand::Open(args.to_owned()))
        }
        "part" => {
            let name = if args.is_empty() { current.take()? } else { args.to_owned() };
            if current.as_deref() == Some(name.as_str()) {
                *current = None;
            }
            Some(UserCommand::Close(name))
        }
        "msg" => {
            let (target, text) = args.split_once(' ')?;
            *current = Some(target.to_owned());
            Some(UserCommand::Say {
                target: target.to_owned(),
                text: text.to_owned(),
            })
        }
        "autojoin" => {
            let (channel, setting) = args.split_once(' ')?;
            Some(UserCommand::Autojoin {
                channel: channel.to_owned(),
                enabled: setting.trim() == "on",
            })
        }
        "quit" => Some(UserCommand::Quit((!args.is_empty()).then(|| args.to_owned()))),
        _ => {
            eprintln!("unknown command: /{}", word);
            None
        }
    }
}

async fn read_input(commands: mpsc::Sender<UserCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current = None;
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(command) = parse_input(&line, &mut current) {
            let quit = matches!(command, UserCommand::Quit(_));
            if commands.send(command).await.is_err() || quit {
                return;
            }
        }
    }
}

async fn session<A: ArchiveSink>(config: SessionConfig, archive: A) -> Result<()> {
    let stream = transport::connect(&config).await?;
    if !stream.is_tls() {
        tracing::warn!(server = %config.server, "connection is not encrypted");
    }
    let mut session = Session::new(config, Terminal, archive);

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(read_input(tx));

    transport::run_stream(&mut session, stream, rx).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lip=info,lip_irc=info".into()),
        )
        .init();

    let args = Args::parse();
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let (config, archive) = resolve(&args, file)?;

    match archive {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("can't open archive {}", path.display()))?;
            session(config, JsonLinesArchive::new(file)).await
        }
        None => session(config, NullArchive).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["lip"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_resolve_prefers_command_line() {
        let file = FileConfig {
            nick: Some("filenick".into()),
            server: Some("irc.file.example".into()),
            port: Some(6667),
            tls: Some(false),
            autojoin: Some(vec!["#file".into()]),
            ..FileConfig::default()
        };
        let (config, archive) = resolve(&args(&["--nick", "me", "--tls", "-j", "#cli"]), file).unwrap();
        assert_eq!(config.nick, "me");
        assert_eq!(config.server, "irc.file.example");
        assert_eq!(config.port, 6667);
        assert!(config.use_tls);
        assert_eq!(config.autojoin, vec!["#file".to_owned(), "#cli".to_owned()]);
        assert!(archive.is_none());
    }

    #[test]
    fn test_resolve_needs_nick() {
        assert!(resolve(&args(&[]), FileConfig::default()).is_err());
    }

    #[test]
    fn test_parse_input() {
        let mut current = None;
        assert_eq!(parse_input("hello", &mut current), None);
        assert_eq!(
            parse_input("/join #chat", &mut current),
            Some(UserCommand::Open("#chat".into()))
        );
        assert_eq!(
            parse_input("hello", &mut current),
            Some(UserCommand::Say {
                target: "#chat".into(),
                text: "hello".into()
            })
        );
        assert_eq!(
            parse_input("/autojoin #chat on", &mut current),
            Some(UserCommand::Autojoin {
                channel: "#chat".into(),
                enabled: true
            })
        );
        assert_eq!(parse_input("/quit", &mut current), Some(UserCommand::Quit(None)));
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn chat_line(text: &str) -> DisplayLine {
        DisplayLine {
            time: chrono::Local::now(),
            from: Some("alice".into()),
            tag: Some(Tag::Theirs),
            runs: lip_irc::markup::decode(text, Some(Tag::Theirs)),
            new_day: false,
        }
    }

    #[test]
    fn test_write_line_styles_runs() {
        let window = Window::Channel { key: "#chat", name: "#Chat" };
        let mut out = Vec::new();
        write_line(&mut out, window, &chat_line("hi \x02there\x02")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("#Chat ["));
        assert!(text.ends_with("<alice> hi \x1b[1mthere\x1b[0m\n"));
    }

    #[test]
    fn test_write_line_reports_failure() {
        let err = write_line(&mut Closed, Window::Console, &chat_line("hi")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_parse_part() {
        let mut current = None;
        assert_eq!(parse_input("/part", &mut current), None);

        parse_input("/join #chat", &mut current);
        assert_eq!(
            parse_input("/part", &mut current),
            Some(UserCommand::Close("#chat".into()))
        );
        assert_eq!(current, None);

        parse_input("/join #chat", &mut current);
        assert_eq!(
            parse_input("/part alice", &mut current),
            Some(UserCommand::Close("alice".into()))
        );
        assert_eq!(current.as_deref(), Some("#chat"));
    }
}
