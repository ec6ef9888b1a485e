//! Reassembly of the inbound byte stream into CRLF-terminated lines.
//!
//! The framer owns a fixed-capacity buffer. Bytes are appended at `end`,
//! scanned for `\r\n`, and every complete line is handed out with its
//! terminator stripped. Whatever follows the last terminator is shifted to
//! the start of the buffer. Between calls the invariant
//! `end < capacity` holds: a buffer that fills up without completing a line
//! is an overflow, and an embedded NUL anywhere in new input is rejected.
//! Both are fatal to the connection.
//!
//! A lone `\n` does not end a line; only `\r\n` does.

use crate::error::FramingError;

/// Default input buffer capacity, the classic IRC line limit.
pub const DEFAULT_CAPACITY: usize = 512;

/// Fixed-capacity line framer.
#[derive(Debug, Clone)]
pub struct LineFramer {
    buffer: Box<[u8]>,
    /// Number of buffered bytes not yet consumed as lines.
    end: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create a framer with the default 512 byte buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a framer with a custom buffer capacity.
    ///
    /// The capacity is raised to 2 if smaller, the size of a bare `\r\n`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity.max(2)].into_boxed_slice(),
            end: 0,
        }
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes received but not yet part of a complete line.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.end]
    }

    /// Discard any partial line.
    pub fn reset(&mut self) {
        self.end = 0;
    }

    /// Free space a reader may fill before calling [`commit`](Self::commit).
    ///
    /// Never empty between calls.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.end..]
    }

    /// Append `bytes` and return every line they complete.
    ///
    /// Input larger than the free space is consumed in buffer-sized steps,
    /// so feeding a stream in one chunk or byte by byte yields the same
    /// lines in the same order.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<String>, FramingError> {
        let mut lines = Vec::new();
        let mut input = bytes;
        while !input.is_empty() {
            let spare = self.spare_mut();
            let n = spare.len().min(input.len());
            spare[..n].copy_from_slice(&input[..n]);
            input = &input[n..];
            self.scan(n, &mut lines)?;
        }
        Ok(lines)
    }

    /// Account for `n` bytes written into [`spare_mut`](Self::spare_mut)
    /// and return the lines they complete.
    pub fn commit(&mut self, n: usize) -> Result<Vec<String>, FramingError> {
        let mut lines = Vec::new();
        self.scan(n, &mut lines)?;
        Ok(lines)
    }

    fn scan(&mut self, n: usize, lines: &mut Vec<String>) -> Result<(), FramingError> {
        let start = self.end;
        self.end = (start + n).min(self.capacity());

        let mut base = 0;
        for i in start..self.end {
            match self.buffer[i] {
                0 => return Err(FramingError::EmbeddedNul { offset: i }),
                b'\n' if i > base && self.buffer[i - 1] == b'\r' => {
                    let line = &self.buffer[base..i - 1];
                    lines.push(String::from_utf8_lossy(line).into_owned());
                    base = i + 1;
                }
                _ => {}
            }
        }

        self.buffer.copy_within(base..self.end, 0);
        self.end -= base;

        if self.end == self.capacity() {
            return Err(FramingError::Overflow {
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}
