//! IRC case folding for channel and nick keys.
//!
//! Channel names and nicknames compare case-insensitively under the
//! "scandinavian" `rfc1459` mapping: ASCII lower-casing plus four bracket
//! substitutions. Every substitution maps an ASCII byte to an ASCII byte,
//! so a folded string has exactly the byte offsets of its original. The
//! highlighter depends on that to map matches found in folded text back
//! onto the unfolded message.

/// Fold a single character.
///
/// In addition to ASCII lowercase conversion, this maps:
/// - `[` → `{`
/// - `]` → `}`
/// - `\` → `|`
/// - `~` → `^`
#[inline]
pub fn fold_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}

/// Convert a string to its case-fold key.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(fold_char).eq(b.chars().map(fold_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_brackets() {
        assert_eq!(irc_to_lower("Nick[Away]"), "nick{away}");
        assert_eq!(irc_to_lower("a\\b~c"), "a|b^c");
    }

    #[test]
    fn test_fold_leaves_non_ascii_alone() {
        assert_eq!(irc_to_lower("#ÄÖ"), "#ÄÖ");
        assert_eq!(irc_to_lower("#ÄÖ").len(), "#ÄÖ".len());
    }

    #[test]
    fn test_irc_eq() {
        assert!(irc_eq("#Rust", "#rust"));
        assert!(irc_eq("[foo]", "{FOO}"));
        assert!(irc_eq("a^b", "A~B"));
        assert!(!irc_eq("#rust", "#rusty"));
        assert!(!irc_eq("abc", "abd"));
    }

    #[test]
    fn test_folding_is_idempotent() {
        let once = irc_to_lower("#Chat[\\]~");
        assert_eq!(irc_to_lower(&once), once);
    }
}
