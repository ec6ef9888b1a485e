//! Channel and private-conversation registry.
//!
//! Channels are keyed by the IRC case fold of their name, so `#Rust` and
//! `#rust` are the same channel. A private conversation is a channel keyed
//! by the other party's nick. Protocol traffic never removes a channel.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Local, NaiveDate};

use crate::casemap::irc_to_lower;
use crate::sink::DisplayLine;

/// No limit on the number of open channels.
pub const UNLIMITED: usize = usize::MAX;

/// Number of recent lines a channel keeps.
pub const LOG_CAPACITY: usize = 1000;

/// Tracks the local date of the last line shown in a window.
#[derive(Debug, Default, Clone)]
pub(crate) struct DayTracker {
    last: Option<NaiveDate>,
}

impl DayTracker {
    /// Record a line at `time`; true if its date differs from the previous
    /// line's.
    pub(crate) fn advance(&mut self, time: &DateTime<Local>) -> bool {
        let today = time.date_naive();
        let changed = self.last != Some(today);
        self.last = Some(today);
        changed
    }
}

/// State of one channel or private conversation.
#[derive(Debug, Clone)]
pub struct Channel {
    key: String,
    name: String,
    /// Join this channel after every welcome.
    pub autojoin: bool,
    nicks: HashSet<String>,
    log: VecDeque<DisplayLine>,
    pub(crate) day: DayTracker,
}

impl Channel {
    fn new(key: String, name: &str, autojoin: bool) -> Self {
        Self {
            key,
            name: name.to_owned(),
            autojoin,
            nicks: HashSet::new(),
            log: VecDeque::new(),
            day: DayTracker::default(),
        }
    }

    /// Case-fold key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name as first opened.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-folded nicks known to be present.
    pub fn nicks(&self) -> &HashSet<String> {
        &self.nicks
    }

    /// Whether `nick` is known to be present.
    pub fn has_nick(&self, nick: &str) -> bool {
        self.nicks.contains(&irc_to_lower(nick))
    }

    /// Replace the present nicks wholesale.
    pub fn set_nicks<I, S>(&mut self, nicks: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.nicks = nicks.into_iter().map(|n| irc_to_lower(n.as_ref())).collect();
    }

    /// Note a nick as present.
    pub fn add_nick(&mut self, nick: &str) {
        self.nicks.insert(irc_to_lower(nick));
    }

    /// Note a nick as gone.
    pub fn remove_nick(&mut self, nick: &str) {
        self.nicks.remove(&irc_to_lower(nick));
    }

    /// Recent lines, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &DisplayLine> {
        self.log.iter()
    }

    pub(crate) fn push_log(&mut self, line: DisplayLine) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

/// Channels by case-fold key.
#[derive(Debug, Default, Clone)]
pub struct ChannelRegistry {
    channels: HashMap<String, Channel>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the channel called `name`, creating it unless `limit`
    /// channels already exist.
    ///
    /// With `limit` 0 this never creates anything. An existing channel is
    /// returned whatever the limit; `autojoin` only ever turns its flag on.
    pub fn open(&mut self, name: &str, limit: usize, autojoin: bool) -> Option<&mut Channel> {
        let key = irc_to_lower(name);
        let count = self.channels.len();
        match self.channels.entry(key) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                let channel = entry.into_mut();
                channel.autojoin |= autojoin;
                Some(channel)
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                if count >= limit {
                    return None;
                }
                tracing::debug!(channel = %name, "open channel");
                let key = entry.key().clone();
                Some(entry.insert(Channel::new(key, name, autojoin)))
            }
        }
    }

    /// The channel called `name`, if open.
    pub fn lookup(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&irc_to_lower(name))
    }

    /// Mutable access to the channel called `name`, if open.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&irc_to_lower(name))
    }

    /// Close a channel on user request.
    pub fn close(&mut self, name: &str) -> Option<Channel> {
        self.channels.remove(&irc_to_lower(name))
    }

    /// Number of open channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is open.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// All open channels, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }
}
