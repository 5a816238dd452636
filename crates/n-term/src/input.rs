// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into key events. The grammar is the small VT100
// subset every terminal emulator speaks in its default mode:
//
//   ESC [ A | B | C | D      arrows
//   ESC [ H | F              Home / End
//   ESC O H | F              Home / End (application cursor mode)
//   ESC [ <digit> ~          Home (1, 7), Delete (3), End (4, 8),
//                            PageUp (5), PageDown (6)
//
// Anything else that starts with ESC decodes as a plain Escape key. The
// lookahead never exceeds three bytes, and each lookahead read is bounded
// by the raw-mode read timeout, so a lone Escape press resolves after one
// timeout instead of blocking for more input.
//
// Control bytes are normalized the way the terminal produced them: the
// byte for Ctrl+Q (0x11) decodes as `Char('q')` with `Modifiers::CTRL`.

use bitflags::bitflags;
use tracing::trace;

use crate::error::{Error, Result};
use crate::reader::ByteSource;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// An unmodified key.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + an ASCII letter.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Ctrl + `ch`.
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable ASCII character (or a Ctrl letter, with `CTRL` set).
    Char(char),
    /// Any other byte, passed through literally.
    Byte(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Legacy terminal input only encodes Ctrl for letters, so that is
    /// the only modifier the decoder ever sets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0100;
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;

/// Block until a key arrives and decode it.
///
/// "No data yet" reads are retried indefinitely.
///
/// # Errors
///
/// Returns [`Error::Read`] if the underlying read fails outright.
pub fn read_key(src: &mut impl ByteSource) -> Result<KeyEvent> {
    loop {
        if let Some(key) = poll_key(src)? {
            return Ok(key);
        }
    }
}

/// Decode one key if a byte is available, or return `None` after one read
/// timeout with no input.
///
/// Once the first byte has arrived, any escape-sequence lookahead is read
/// in the same call.
///
/// # Errors
///
/// Returns [`Error::Read`] if the underlying read fails outright.
pub fn poll_key(src: &mut impl ByteSource) -> Result<Option<KeyEvent>> {
    let Some(byte) = src.read_byte().map_err(Error::Read)? else {
        return Ok(None);
    };

    let key = if byte == ESC {
        KeyEvent::new(decode_escape(src)?)
    } else {
        decode_byte(byte)
    };

    trace!(?key, "key");
    Ok(Some(key))
}

/// Decode the bytes following an ESC.
fn decode_escape(src: &mut impl ByteSource) -> Result<KeyCode> {
    let Some(first) = src.read_byte().map_err(Error::Read)? else {
        return Ok(KeyCode::Escape);
    };
    let Some(second) = src.read_byte().map_err(Error::Read)? else {
        return Ok(KeyCode::Escape);
    };

    let code = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => {
            let Some(third) = src.read_byte().map_err(Error::Read)? else {
                return Ok(KeyCode::Escape);
            };
            if third == b'~' {
                match digit {
                    b'1' | b'7' => Some(KeyCode::Home),
                    b'3' => Some(KeyCode::Delete),
                    b'4' | b'8' => Some(KeyCode::End),
                    b'5' => Some(KeyCode::PageUp),
                    b'6' => Some(KeyCode::PageDown),
                    _ => None,
                }
            } else {
                None
            }
        }
        (b'[', b'A') => Some(KeyCode::Up),
        (b'[', b'B') => Some(KeyCode::Down),
        (b'[', b'C') => Some(KeyCode::Right),
        (b'[', b'D') => Some(KeyCode::Left),
        (b'[' | b'O', b'H') => Some(KeyCode::Home),
        (b'[' | b'O', b'F') => Some(KeyCode::End),
        _ => None,
    };

    Ok(code.unwrap_or_else(|| {
        trace!(first, second, "unrecognized escape sequence");
        KeyCode::Escape
    }))
}

/// Decode a single non-escape byte.
const fn decode_byte(byte: u8) -> KeyEvent {
    match byte {
        0x09 => KeyEvent::new(KeyCode::Tab),
        0x0A | 0x0D => KeyEvent::new(KeyCode::Enter),
        0x08 | 0x7F => KeyEvent::new(KeyCode::Backspace),
        0x00 => KeyEvent::ctrl('@'),
        b @ 0x01..=0x1A => KeyEvent::ctrl((b + b'a' - 1) as char),
        b @ 0x20..=0x7E => KeyEvent::new(KeyCode::Char(b as char)),
        b => KeyEvent::new(KeyCode::Byte(b)),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
