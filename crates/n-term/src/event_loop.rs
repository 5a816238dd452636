// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — the heartbeat of the viewer.
//
// Single-threaded and synchronous: draw a frame, wait for a key, let the
// application react, repeat. There is no background reader and no timer
// thread. The only clock is the raw-mode read timeout (~100ms), which
// turns the "wait for a key" step into a poll. Each empty poll gives the
// loop a chance to notice a terminal resize or an expired status message
// and redraw without a keypress.
//
// # Frames
//
// The application paints into a fresh `OutputBuffer`, which is written
// with one `write()`. A frame is never half on screen.
//
// # SIGWINCH Handling
//
// Terminal resize is detected via a SIGWINCH handler that sets an
// `AtomicBool`. The loop checks this flag each iteration, re-queries the
// window size and triggers a redraw.
//
// # Teardown
//
// Whether the application quits or the loop fails, the screen is cleared
// and the raw-mode guard restores the original terminal attributes before
// `run` returns.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::ansi;
use crate::error::Result;
use crate::input::{KeyEvent, poll_key};
use crate::output::OutputBuffer;
use crate::reader::ByteSource;
#[cfg(unix)]
use crate::reader::RawStdin;
#[cfg(unix)]
use crate::terminal::{RawMode, RawStdout};
use crate::terminal::{self, Size};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler. Checked each loop iteration.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH (terminal resize).
///
/// The handler simply sets the [`SIGWINCH_RECEIVED`] flag. This is
/// async-signal-safe: writing to an atomic is one of the few operations
/// permitted inside signal handlers.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {
    // No-op on non-unix platforms.
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Each iteration the loop calls, in order:
///
/// 1. [`on_resize`](App::on_resize) — once at startup and after a resize
/// 2. [`on_tick`](App::on_tick) — every iteration
/// 3. [`paint`](App::paint) — when something changed
/// 4. [`on_key`](App::on_key) — when a key arrived
pub trait App {
    /// Handle a decoded key. Return [`Action::Quit`] to exit the loop.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// Handle the terminal size, at startup and on every resize.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every loop iteration, even when no key arrived.
    ///
    /// Return `true` if time-based state changed and a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint one complete frame.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the frame buffer.
    fn paint(&mut self, frame: &mut OutputBuffer) -> io::Result<()>;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// # Example
///
/// ```no_run
/// use n_term::event_loop::{Action, App, EventLoop};
/// use n_term::input::{KeyCode, KeyEvent};
/// use n_term::output::OutputBuffer;
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.is_ctrl('q') {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&mut self, frame: &mut OutputBuffer) -> std::io::Result<()> {
///         frame.push_bytes(b"\x1b[Hhello");
///         Ok(())
///     }
/// }
///
/// EventLoop::run(&mut MyApp)?;
/// # Ok::<(), n_term::Error>(())
/// ```
pub struct EventLoop;

impl EventLoop {
    /// Run the loop on the controlling terminal until the application
    /// returns [`Action::Quit`].
    ///
    /// This method:
    /// 1. Enters raw mode
    /// 2. Installs the SIGWINCH handler
    /// 3. Measures the window
    /// 4. Alternates frames and key polls
    /// 5. Clears the screen and restores the terminal (even on error)
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered, the window size is
    /// unavailable, or terminal I/O fails.
    #[cfg(unix)]
    pub fn run(app: &mut impl App) -> Result<()> {
        let mut raw = RawMode::enter()?;
        install_sigwinch_handler();

        let mut out = RawStdout::new();
        let mut input = RawStdin::new();

        let result = terminal::window_size(&mut out, &mut input)
            .and_then(|size| Self::run_inner(app, size, &mut out, &mut input));

        // Always clean up, even if the loop errored.
        let cleared = clear(&mut out);
        let restored = raw.restore();

        result?;
        cleared?;
        restored
    }

    /// The inner loop, generic over its streams so cleanup can run
    /// regardless of outcome and tests can drive it from memory.
    fn run_inner(
        app: &mut impl App,
        size: Size,
        out: &mut impl Write,
        input: &mut impl ByteSource,
    ) -> Result<()> {
        debug!(cols = size.cols, rows = size.rows, "window size");
        app.on_resize(size);
        let mut dirty = true; // First frame always renders.

        loop {
            // ── Check for terminal resize ────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                if let Some(new_size) = terminal::get_size() {
                    debug!(cols = new_size.cols, rows = new_size.rows, "resized");
                    app.on_resize(new_size);
                    dirty = true;
                }
            }

            // ── Tick (time-based state) ──────────────────────────
            if app.on_tick() {
                dirty = true;
            }

            // ── Render if dirty ──────────────────────────────────
            if dirty {
                let mut frame = OutputBuffer::new();
                app.paint(&mut frame)?;
                frame.flush_to(out)?;
                dirty = false;
            }

            // ── Wait for a key (bounded by the read timeout) ─────
            if let Some(key) = poll_key(input)? {
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
                dirty = true;
            }
        }
    }
}

/// Clear the screen and home the cursor.
fn clear(out: &mut impl Write) -> Result<()> {
    ansi::clear_screen(out)?;
    ansi::cursor_home(out)?;
    ansi::cursor_show(out)?;
    out.flush()?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
