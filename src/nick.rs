//! Name checks used before a window is opened or a reply is trusted.
//!
//! Nicknames follow the RFC 2812 grammar: a letter or one of ``[]\`_^{|}``
//! first, then letters, digits, those specials or `-`.

/// Longest nickname the client accepts.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

/// Maximum channel name length, prefix included.
pub const MAX_CHANNEL_NAME_LEN: usize = 50;

/// Nickname validation on string slices.
pub trait NickExt {
    /// Whether this is a nickname of at most [`DEFAULT_NICK_MAX_LEN`] bytes.
    ///
    /// ```
    /// use lip_irc::NickExt;
    ///
    /// assert!("alice".is_valid_nick());
    /// assert!("[bot]".is_valid_nick());
    /// assert!(!"9lives".is_valid_nick());
    /// assert!(!"#rust".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Like [`is_valid_nick`](NickExt::is_valid_nick) with another limit.
    fn is_valid_nick_len(&self, max_len: usize) -> bool;
}

/// Channel name validation on string slices.
pub trait ChannelExt {
    /// Valid channel names start with `#`, `&`, `+` or `!`, contain no
    /// space, comma, BEL or other control character, and are at most 50
    /// characters long.
    fn is_channel_name(&self) -> bool;
}

fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

fn is_nick_start(c: char) -> bool {
    c.is_ascii_alphabetic() || is_special(c)
}

fn is_nick_char(c: char) -> bool {
    is_nick_start(c) || c.is_ascii_digit() || c == '-'
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        self.is_valid_nick_len(DEFAULT_NICK_MAX_LEN)
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        let mut chars = self.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        self.len() <= max_len && is_nick_start(first) && chars.all(is_nick_char)
    }
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let mut chars = self.chars();

        match chars.next() {
            Some('#' | '&' | '+' | '!') => {}
            _ => return false,
        }

        if self.chars().count() > MAX_CHANNEL_NAME_LEN {
            return false;
        }

        chars.all(|c| c != ' ' && c != ',' && !c.is_control())
    }
}
