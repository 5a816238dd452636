// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window geometry, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and raw fd writes. These are the standard
// POSIX interfaces for terminal control — there is no safe alternative.
// Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped acquisition: `RawMode::enter()` captures the original
// attributes and applies the raw settings, and dropping the guard puts the
// originals back. Every exit path (quit, error, panic) runs through either
// the guard's `Drop` or the panic hook, so the user's shell is never left
// without echo and line editing.
//
// The attribute calls go through the `TermiosDevice` trait. The real device
// is stdin; tests substitute an in-memory device to check the acquire and
// restore ordering without a TTY.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::reader::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Window Geometry ────────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// terminal reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Determine the window size.
///
/// Tries the ioctl first. If that fails, pushes the cursor to the
/// bottom-right corner and asks the terminal where it ended up. Raw mode
/// must already be active so the reply can be read off `input`.
///
/// # Errors
///
/// Returns [`Error::GeometryUnavailable`] if neither method yields a size,
/// or an I/O error if the fallback query cannot be written.
pub fn window_size(out: &mut impl Write, input: &mut impl ByteSource) -> Result<Size> {
    resolve_size(get_size(), out, input)
}

fn resolve_size(
    direct: Option<Size>,
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<Size> {
    if let Some(size) = direct {
        return Ok(size);
    }

    debug!("TIOCGWINSZ unavailable, falling back to cursor position report");
    ansi::cursor_to_far_corner(out)?;
    query_cursor_position(out, input)
}

/// Ask the terminal for the cursor position and parse the reply.
///
/// # Errors
///
/// Returns [`Error::GeometryUnavailable`] if the reply is malformed or
/// never arrives, [`Error::Read`] on a failed read.
pub fn query_cursor_position(out: &mut impl Write, input: &mut impl ByteSource) -> Result<Size> {
    ansi::request_cursor_position(out)?;
    out.flush()?;

    let mut reply = Vec::with_capacity(32);
    while reply.len() < 31 {
        match input.read_byte().map_err(Error::Read)? {
            Some(b'R') | None => break,
            Some(byte) => reply.push(byte),
        }
    }

    parse_cursor_report(&reply).ok_or(Error::GeometryUnavailable)
}

/// Parse a cursor position report body `ESC [ rows ; cols` (the final `R`
/// already stripped).
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    Some(Size {
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    })
}

// ─── Raw Output ─────────────────────────────────────────────────────────────

/// Unbuffered writer over stdout's file descriptor.
///
/// `io::stdout()` is line-buffered, which would split a frame at its first
/// newline. This writer hands the whole slice to one `write()` call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawStdout;

impl RawStdout {
    /// Create a writer over fd 1.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Write for RawStdout {
    #[cfg(unix)]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
            Ok(n as usize)
        }
    }

    #[cfg(not(unix))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't reach
/// it. This backup — behind a [`Mutex`], not `static mut` — lets the hook
/// restore cooked mode without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Screen cleanup written on panic: clear, home, show cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken and
/// the panic message smeared across a raw screen. The hook writes
/// [`EMERGENCY_RESTORE`] directly to fd 1, restores termios, then delegates
/// to the original panic handler.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = RawStdout.write_all(EMERGENCY_RESTORE);

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

// ─── Attribute Devices ──────────────────────────────────────────────────────

/// Something whose terminal attributes can be read and written.
#[cfg(unix)]
pub trait TermiosDevice {
    /// Read the current attributes (`tcgetattr`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be read.
    fn get_attrs(&mut self) -> io::Result<libc::termios>;

    /// Apply attributes, discarding pending input (`tcsetattr(TCSAFLUSH)`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be applied.
    fn set_attrs(&mut self, attrs: &libc::termios) -> io::Result<()>;
}

/// The controlling terminal, addressed through stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinTty;

#[cfg(unix)]
impl TermiosDevice for StdinTty {
    fn get_attrs(&mut self) -> io::Result<libc::termios> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(termios)
        }
    }

    fn set_attrs(&mut self, attrs: &libc::termios) -> io::Result<()> {
        unsafe {
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, attrs) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

/// Derive raw-mode attributes from the original ones.
///
/// - no echo, no canonical line buffering, no signal keys, no Ctrl-V
/// - no software flow control, no CR→NL translation, no break/parity/strip
/// - no output post-processing
/// - 8-bit characters
/// - `read()` returns as soon as one byte is available, or after 100ms
#[cfg(unix)]
#[must_use]
pub fn make_raw(original: &libc::termios) -> libc::termios {
    let mut raw = *original;
    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = 1;
    raw
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard.
///
/// Holds the attributes captured on entry and puts them back on
/// [`restore`](Self::restore) or drop, whichever comes first.
///
/// # Example
///
/// ```no_run
/// use n_term::terminal::RawMode;
///
/// let raw = RawMode::enter()?;
/// // ... read keys, draw frames ...
/// drop(raw); // cooked mode again
/// # Ok::<(), n_term::Error>(())
/// ```
#[cfg(unix)]
pub struct RawMode<D: TermiosDevice = StdinTty> {
    device: D,
    original: libc::termios,
    active: bool,
}

#[cfg(unix)]
impl RawMode<StdinTty> {
    /// Put the controlling terminal into raw mode.
    ///
    /// Also installs the panic hook (once per process) and records the
    /// original attributes for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attributes`] if the attributes cannot be captured
    /// or applied — for example when stdin is not a terminal.
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        let guard = Self::enter_with(StdinTty)?;

        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = Some(guard.original);
        }
        Ok(guard)
    }
}

#[cfg(unix)]
impl<D: TermiosDevice> RawMode<D> {
    /// Capture `device`'s attributes and switch it to raw mode.
    ///
    /// Nothing is changed if the capture fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attributes`] naming the call that failed.
    pub fn enter_with(mut device: D) -> Result<Self> {
        let original = device.get_attrs().map_err(|source| Error::Attributes {
            call: "tcgetattr",
            source,
        })?;

        device
            .set_attrs(&make_raw(&original))
            .map_err(|source| Error::Attributes {
                call: "tcsetattr",
                source,
            })?;

        debug!("raw mode entered");
        Ok(Self {
            device,
            original,
            active: true,
        })
    }

    /// Whether raw mode is still in effect.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The underlying device.
    #[inline]
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Put the original attributes back. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attributes`] if `tcsetattr` fails; the guard stays
    /// active so drop will try again.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.device
            .set_attrs(&self.original)
            .map_err(|source| Error::Attributes {
                call: "tcsetattr",
                source,
            })?;
        self.active = false;

        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = None;
        }
        debug!("raw mode restored");
        Ok(())
    }
}

#[cfg(unix)]
impl<D: TermiosDevice> Drop for RawMode<D> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal attributes");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── Cursor report parsing ───────────────────────────────────────

    #[test]
    fn parse_report() {
        assert_eq!(
            parse_cursor_report(b"\x1b[24;80"),
            Some(Size { cols: 80, rows: 24 })
        );
    }

    #[test]
    fn parse_report_rejects_missing_prefix() {
        assert_eq!(parse_cursor_report(b"24;80"), None);
        assert_eq!(parse_cursor_report(b"\x1b24;80"), None);
    }

    #[test]
    fn parse_report_rejects_non_numbers() {
        assert_eq!(parse_cursor_report(b"\x1b[a;80"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24;"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24"), None);
        assert_eq!(parse_cursor_report(b""), None);
    }

    // ── Geometry fallback ───────────────────────────────────────────

    #[test]
    fn direct_size_skips_fallback() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"";
        let size = resolve_size(Some(Size { cols: 100, rows: 40 }), &mut out, &mut input).unwrap();
        assert_eq!(size, Size { cols: 100, rows: 40 });
        assert!(out.is_empty(), "no escape sequences should be written");
    }

    #[test]
    fn fallback_moves_cursor_and_queries() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"\x1b[50;132R";
        let size = resolve_size(None, &mut out, &mut input).unwrap();
        assert_eq!(size, Size { cols: 132, rows: 50 });
        assert_eq!(out, b"\x1b[999C\x1b[999B\x1b[6n");
    }

    #[test]
    fn fallback_without_reply_is_geometry_error() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"";
        let err = resolve_size(None, &mut out, &mut input).unwrap_err();
        assert!(matches!(err, Error::GeometryUnavailable));
    }

    #[test]
    fn fallback_garbage_reply_is_geometry_error() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"hello R";
        assert!(matches!(
            query_cursor_position(&mut out, &mut input),
            Err(Error::GeometryUnavailable)
        ));
    }

    #[test]
    fn query_stops_at_r() {
        let mut out = Vec::new();
        let mut input: &[u8] = b"\x1b[10;20Rx";
        query_cursor_position(&mut out, &mut input).unwrap();
        assert_eq!(input, b"x");
    }

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    // ── Raw attributes ──────────────────────────────────────────────

    fn zeroed_termios() -> libc::termios {
        unsafe { std::mem::zeroed() }
    }

    fn cooked() -> libc::termios {
        let mut t = zeroed_termios();
        t.c_iflag = libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON;
        t.c_oflag = libc::OPOST;
        t.c_lflag = libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG;
        t.c_cc[libc::VMIN] = 1;
        t
    }

    #[test]
    fn make_raw_clears_line_discipline() {
        let raw = make_raw(&cooked());
        assert_eq!(raw.c_lflag & (libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG), 0);
        assert_eq!(raw.c_iflag & (libc::IXON | libc::ICRNL), 0);
        assert_eq!(raw.c_oflag & libc::OPOST, 0);
        assert_eq!(raw.c_cflag & libc::CS8, libc::CS8);
    }

    #[test]
    fn make_raw_sets_polling_read() {
        let raw = make_raw(&cooked());
        assert_eq!(raw.c_cc[libc::VMIN], 0);
        assert_eq!(raw.c_cc[libc::VTIME], 1);
    }

    #[test]
    fn make_raw_keeps_unrelated_flags() {
        let mut t = cooked();
        t.c_lflag |= libc::ECHOE;
        let raw = make_raw(&t);
        assert_eq!(raw.c_lflag & libc::ECHOE, libc::ECHOE);
    }

    // ── RawMode guard ───────────────────────────────────────────────

    /// In-memory device that records every attribute write.
    #[derive(Clone)]
    struct FakeTty {
        current: Rc<RefCell<libc::termios>>,
        writes: Rc<RefCell<usize>>,
        fail_get: bool,
        fail_set: bool,
    }

    impl FakeTty {
        fn new() -> Self {
            Self {
                current: Rc::new(RefCell::new(cooked())),
                writes: Rc::new(RefCell::new(0)),
                fail_get: false,
                fail_set: false,
            }
        }

        fn echo_on(&self) -> bool {
            self.current.borrow().c_lflag & libc::ECHO != 0
        }
    }

    impl TermiosDevice for FakeTty {
        fn get_attrs(&mut self) -> io::Result<libc::termios> {
            if self.fail_get {
                return Err(io::Error::from_raw_os_error(libc::ENOTTY));
            }
            Ok(*self.current.borrow())
        }

        fn set_attrs(&mut self, attrs: &libc::termios) -> io::Result<()> {
            if self.fail_set {
                return Err(io::Error::from_raw_os_error(libc::EIO));
            }
            *self.current.borrow_mut() = *attrs;
            *self.writes.borrow_mut() += 1;
            Ok(())
        }
    }

    #[test]
    fn enter_applies_raw_and_drop_restores() {
        let tty = FakeTty::new();
        let raw = RawMode::enter_with(tty.clone()).unwrap();
        assert!(raw.is_active());
        assert!(!tty.echo_on());

        drop(raw);
        assert!(tty.echo_on());
        assert_eq!(*tty.writes.borrow(), 2);
    }

    #[test]
    fn restore_is_idempotent() {
        let tty = FakeTty::new();
        let mut raw = RawMode::enter_with(tty.clone()).unwrap();
        raw.restore().unwrap();
        raw.restore().unwrap();
        assert!(!raw.is_active());
        drop(raw);
        // enter + one restore; neither the second restore nor drop writes.
        assert_eq!(*tty.writes.borrow(), 2);
    }

    #[test]
    fn failed_capture_changes_nothing() {
        let mut tty = FakeTty::new();
        tty.fail_get = true;
        let err = RawMode::enter_with(tty.clone()).err().unwrap();
        assert!(matches!(err, Error::Attributes { call: "tcgetattr", .. }));
        assert_eq!(*tty.writes.borrow(), 0);
        assert!(tty.echo_on());
    }

    #[test]
    fn failed_apply_is_reported() {
        let mut tty = FakeTty::new();
        tty.fail_set = true;
        let err = RawMode::enter_with(tty).err().unwrap();
        assert!(matches!(err, Error::Attributes { call: "tcsetattr", .. }));
    }

    #[test]
    fn restore_runs_on_error_path() {
        fn work(tty: FakeTty) -> Result<()> {
            let _raw = RawMode::enter_with(tty)?;
            Err(Error::GeometryUnavailable)
        }

        let tty = FakeTty::new();
        assert!(work(tty.clone()).is_err());
        assert!(tty.echo_on());
    }

    // ── Emergency restore ───────────────────────────────────────────

    #[test]
    fn emergency_restore_shows_cursor_last() {
        assert!(EMERGENCY_RESTORE.starts_with(b"\x1b[2J"));
        assert!(EMERGENCY_RESTORE.ends_with(b"\x1b[?25h"));
    }
}
