//! Tokio transport: connect to the server and pump a [`Session`].
//!
//! [`connect`] opens a plain or TLS stream per the session configuration.
//! [`run`] drives one session over any async stream, interleaving server
//! input with [`UserCommand`]s from the host until the session closes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{FramingError, ProtocolError};
use crate::markup::Tag;
use crate::session::Session;
use crate::sink::{ArchiveSink, DisplaySink};

/// Size of one socket read.
const READ_CHUNK: usize = 4096;

/// An action requested by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserCommand {
    /// Open a window for a channel or nick, joining channels.
    Open(String),
    /// Send styled text to an open window.
    Say {
        /// Window name.
        target: String,
        /// Text with marker glyphs.
        text: String,
    },
    /// Close a window, leaving it if it is a channel.
    Close(String),
    /// Turn auto-join on or off.
    Autojoin {
        /// Channel name.
        channel: String,
        /// New setting.
        enabled: bool,
    },
    /// Leave the server.
    Quit(Option<String>),
}

/// A connected server stream.
#[derive(Debug)]
pub enum ServerStream {
    /// Plain TCP.
    Plain(TcpStream),
    /// TCP wrapped in TLS.
    Tls(Box<TlsStream<TcpStream>>),
}

impl ServerStream {
    /// Whether the stream is encrypted.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// Open a connection to the configured server.
pub async fn connect(config: &SessionConfig) -> Result<ServerStream> {
    let addr = (config.server.as_str(), config.port);
    debug!(server = %config.server, port = config.port, "connecting");
    let tcp = TcpStream::connect(addr)
        .await
        .with_context(|| format!("TCP connect to {}:{} failed", config.server, config.port))?;

    if let Err(e) = enable_keepalive(&tcp) {
        warn!("failed to enable TCP keepalive: {}", e);
    }

    if !config.use_tls {
        info!(server = %config.server, "connected");
        return Ok(ServerStream::Plain(tcp));
    }

    let roots = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(tls_config));
    let server_name = ServerName::try_from(config.server.clone())
        .with_context(|| format!("invalid TLS server name {:?}", config.server))?;
    let tls = connector
        .connect(server_name, tcp)
        .await
        .with_context(|| format!("TLS handshake with {} failed", config.server))?;
    info!(server = %config.server, "connected with TLS");
    Ok(ServerStream::Tls(Box::new(tls)))
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));
    SockRef::from(stream).set_tcp_keepalive(&keepalive)
}

/// Drive `session` over a connected server stream.
pub async fn run_stream<D, A>(
    session: &mut Session<D, A>,
    stream: ServerStream,
    commands: mpsc::Receiver<UserCommand>,
) -> Result<(), ProtocolError>
where
    D: DisplaySink,
    A: ArchiveSink,
{
    match stream {
        ServerStream::Plain(tcp) => run(session, tcp, commands).await,
        ServerStream::Tls(tls) => run(session, tls, commands).await,
    }
}

/// Drive `session` over `stream` until it closes.
///
/// The session is told the transport is up, then server input and user
/// commands are handled as they arrive. Queued output is written after
/// every step. Closing the command channel quits the session.
pub async fn run<S, D, A>(
    session: &mut Session<D, A>,
    stream: S,
    mut commands: mpsc::Receiver<UserCommand>,
) -> Result<(), ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: DisplaySink,
    A: ArchiveSink,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut buf = vec![0u8; READ_CHUNK];

    session.connected();
    flush(session, &mut writer).await?;

    while !session.is_closed() {
        tokio::select! {
            read = reader.read(&mut buf) => match read {
                Ok(0) => return Err(session.tear_down(FramingError::PeerClosed.into())),
                Ok(n) => session.feed(&buf[..n])?,
                Err(e) => return Err(session.tear_down(FramingError::Io(e).into())),
            },
            command = commands.recv() => match command {
                Some(command) => apply(session, command),
                None => session.quit(None),
            },
        }
        flush(session, &mut writer).await?;
    }

    if let Err(e) = writer.shutdown().await {
        debug!(error = %e, "shutdown failed");
    }
    Ok(())
}

/// Carry out a user command, reporting refusals in the console.
pub fn apply<D: DisplaySink, A: ArchiveSink>(session: &mut Session<D, A>, command: UserCommand) {
    let result = match command {
        UserCommand::Open(name) => session.open_channel(&name).map(|_| ()),
        UserCommand::Say { target, text } => session.send_text(&target, &text),
        UserCommand::Close(name) => session.close_channel(&name),
        UserCommand::Autojoin { channel, enabled } => {
            session.set_autojoin(&channel, enabled);
            Ok(())
        }
        UserCommand::Quit(reason) => {
            session.quit(reason.as_deref());
            Ok(())
        }
    };
    if let Err(e) = result {
        session.console(Some(Tag::Error), &e.to_string());
    }
}

async fn flush<W, D, A>(session: &mut Session<D, A>, writer: &mut W) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    D: DisplaySink,
    A: ArchiveSink,
{
    let out = session.take_output();
    if out.is_empty() {
        return Ok(());
    }
    let written = async {
        writer.write_all(&out).await?;
        writer.flush().await
    }
    .await;
    match written {
        Ok(()) => Ok(()),
        Err(e) => Err(session.tear_down(FramingError::Io(e).into())),
    }
}
