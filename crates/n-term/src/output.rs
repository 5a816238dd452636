// SPDX-License-Identifier: MIT
//
// Frame output buffering.
//
// A frame is assembled into one growable byte buffer and handed to the
// terminal in a single write. Writing escape sequences and row text piece
// by piece lets the terminal paint half-finished frames between writes,
// which shows up as flicker and tearing. One buffer, one write.
//
// The buffer is created per frame and dropped afterwards; `Vec`'s
// amortized growth handles the sizing.

use std::io::{self, Write};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates one frame for a single `write()`.
///
/// Default capacity: 16 KB — a full 80×24 frame with escapes fits well
/// under that, so most frames never reallocate.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append `n` copies of `byte`.
    pub fn push_repeated(&mut self, byte: u8, n: usize) {
        self.buf.resize(self.buf.len() + n, byte);
    }

    /// Write the whole frame to `w` with one `write_all` and flush it.
    ///
    /// Consumes the buffer: frames are built once and discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts `write` calls so tests can check the one-write-per-frame rule.
    #[derive(Default)]
    struct CountingWriter {
        writes: usize,
        flushes: usize,
        bytes: Vec<u8>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn new_is_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn write_trait_appends() {
        let mut buf = OutputBuffer::new();
        write!(buf, "\x1b[{};{}H", 3, 4).unwrap();
        buf.push_bytes(b"abc");
        assert_eq!(buf.as_bytes(), b"\x1b[3;4Habc");
    }

    #[test]
    fn push_repeated_pads() {
        let mut buf = OutputBuffer::new();
        buf.push_bytes(b"~");
        buf.push_repeated(b' ', 3);
        assert_eq!(buf.as_bytes(), b"~   ");
    }

    #[test]
    fn push_repeated_zero_is_noop() {
        let mut buf = OutputBuffer::new();
        buf.push_repeated(b' ', 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_to_is_a_single_write() {
        let mut buf = OutputBuffer::new();
        for _ in 0..100 {
            buf.push_bytes(b"row text\x1b[K\r\n");
        }
        let expected = buf.as_bytes().to_vec();

        let mut out = CountingWriter::default();
        buf.flush_to(&mut out).unwrap();
        assert_eq!(out.writes, 1);
        assert_eq!(out.flushes, 1);
        assert_eq!(out.bytes, expected);
    }

    #[test]
    fn flush_to_empty_is_noop() {
        let mut out = CountingWriter::default();
        OutputBuffer::new().flush_to(&mut out).unwrap();
        assert_eq!(out.writes, 0);
        assert_eq!(out.flushes, 0);
    }
}
