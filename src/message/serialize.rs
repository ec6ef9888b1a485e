use std::fmt::{self, Display, Formatter, Write};

use super::types::Message;

impl Display for Message {
    /// Wire form without the line terminator.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        write!(f, "{}", self.command)?;

        let Some((trailing, middle)) = self.params.split_last() else {
            return Ok(());
        };

        for param in middle {
            f.write_char(' ')?;
            f.write_str(param)?;
        }

        f.write_char(' ')?;

        // Add colon prefix if trailing is empty, contains a space, or starts with ':'
        if self.command.is_freeform()
            || trailing.is_empty()
            || trailing.contains(' ')
            || trailing.starts_with(':')
        {
            f.write_char(':')?;
        }

        f.write_str(trailing)
    }
}
