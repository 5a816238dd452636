// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Raw stdin byte source.
//
// In raw mode the terminal is configured with VMIN=0 / VTIME=1, so a
// `read()` of one byte returns either that byte or, after ~100ms with no
// input, zero bytes. Zero bytes is "no data yet", not end-of-file, and the
// decoder simply asks again. EAGAIN and EINTR are treated the same way.
//
// We read straight from fd 0 rather than through `io::stdin()`: std's
// stdin is buffered, and the cursor-position reply used for window sizing
// has to be consumed byte by byte from the same stream keystrokes use.

use std::io;

/// Something that yields terminal input one byte at a time.
///
/// `Ok(None)` means no byte arrived within the source's timeout. The key
/// decoder uses that to tell a lone Escape press from the start of an
/// escape sequence.
pub trait ByteSource {
    /// Read one byte, or `None` if nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns an error only for read failures that are not a benign
    /// "no data yet" condition.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// In-memory input, consumed front to back. Exhausted input reads as
/// "no data yet".
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

/// Unbuffered reader over the process's stdin file descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawStdin;

impl RawStdin {
    /// Create a reader over fd 0.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for RawStdin {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for RawStdin {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
