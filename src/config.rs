//! Session configuration.
//!
//! The engine receives a ready-made [`SessionConfig`] at connect time.
//! Loading it from a file is the host's business; the `lip` binary reads
//! TOML.

use serde::{Deserialize, Serialize};

use crate::casemap::irc_eq;
use crate::error::ConfigError;
use crate::nick::{ChannelExt, NickExt};

/// Default IRC server.
pub const DEFAULT_SERVER: &str = "irc.oftc.net";
/// Default TLS port.
pub const DEFAULT_PORT: u16 = 6697;

/// Connection and identity settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Nick to register with.
    pub nick: String,
    /// Full name sent with USER.
    pub full_name: String,
    /// Server host name.
    pub server: String,
    /// Server TCP port.
    pub port: u16,
    /// Wrap the connection in TLS.
    pub use_tls: bool,
    /// Channels joined after every welcome.
    pub autojoin: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nick: String::new(),
            full_name: String::new(),
            server: DEFAULT_SERVER.to_owned(),
            port: DEFAULT_PORT,
            use_tls: true,
            autojoin: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Default configuration for `nick`.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ..Self::default()
        }
    }

    /// Check the settings before connecting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.nick.is_valid_nick() {
            return Err(ConfigError::BadNick(self.nick.clone()));
        }
        if self.server.trim().is_empty() || self.server.contains(char::is_whitespace) {
            return Err(ConfigError::BadServer);
        }
        if self.port == 0 {
            return Err(ConfigError::BadPort);
        }
        if let Some(bad) = self.autojoin.iter().find(|c| !c.is_channel_name()) {
            return Err(ConfigError::BadChannel(bad.clone()));
        }
        Ok(())
    }

    /// Full name for USER, falling back to the nick.
    pub fn full_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.nick
        } else {
            &self.full_name
        }
    }

    /// Add or remove an auto-join channel. Returns whether the list changed.
    pub fn set_autojoin(&mut self, name: &str, enabled: bool) -> bool {
        let present = self.autojoin.iter().position(|c| irc_eq(c, name));
        match (present, enabled) {
            (None, true) => {
                self.autojoin.push(name.to_owned());
                true
            }
            (Some(i), false) => {
                self.autojoin.remove(i);
                true
            }
            _ => false,
        }
    }
}
