//! Editor — the viewing session.
//!
//! `Editor` owns everything one run of the viewer needs: the document, the
//! cursor, the viewport, the status message and the options. It implements
//! [`App`], so the n-term event loop drives it:
//!
//! - **keys** go through [`Editor::process_key`], which moves the cursor
//! - **resizes** update the viewport dimensions
//! - **ticks** ask for a repaint when the status message times out
//! - **paint** scrolls the viewport to the cursor and renders a frame
//!
//! Nothing here touches the terminal directly, so the whole session can be
//! driven from tests with plain key events.

use std::io;
use std::time::Instant;

use n_term::event_loop::{Action, App};
use n_term::input::{KeyCode, KeyEvent};
use n_term::output::OutputBuffer;
use n_term::terminal::Size;
use tracing::{debug, trace};

use crate::cursor::{Cursor, Direction};
use crate::document::Document;
use crate::message::StatusMessage;
use crate::options::Options;
use crate::view;
use crate::viewport::Viewport;

/// The key that ends the session.
pub const QUIT_KEY: char = 'q';

/// One viewing session.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    cursor: Cursor,
    viewport: Viewport,
    message: StatusMessage,
    options: Options,

    /// Whether the last painted frame showed the status message.
    message_shown: bool,
}

impl Editor {
    /// A session over `document`. The viewport is empty until the first
    /// resize.
    #[must_use]
    pub fn new(document: Document, options: Options) -> Self {
        Self {
            document,
            cursor: Cursor::new(),
            viewport: Viewport::default(),
            message: StatusMessage::new(),
            options,
            message_shown: false,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn message(&self) -> &StatusMessage {
        &self.message
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    // -- Status message -----------------------------------------------------

    /// Show `text` in the message bar, starting now.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.set_status_at(text, Instant::now());
    }

    /// Show `text` in the message bar, starting at `now`.
    pub fn set_status_at(&mut self, text: impl Into<String>, now: Instant) {
        self.message.set(text, now);
        debug!(message = self.message.text(), "status");
    }

    // -- Input --------------------------------------------------------------

    /// Apply one key to the session.
    pub fn process_key(&mut self, key: KeyEvent) -> Action {
        if key.is_ctrl(QUIT_KEY) {
            debug!("quit");
            return Action::Quit;
        }

        let doc = &self.document;
        match key.code {
            KeyCode::Left => self.cursor.step(Direction::Left, doc),
            KeyCode::Right => self.cursor.step(Direction::Right, doc),
            KeyCode::Up => self.cursor.step(Direction::Up, doc),
            KeyCode::Down => self.cursor.step(Direction::Down, doc),
            KeyCode::Home => self.cursor.home(),
            KeyCode::End => self.cursor.end(doc),
            KeyCode::PageUp => self.cursor.page_up(doc, &self.viewport),
            KeyCode::PageDown => self.cursor.page_down(doc, &self.viewport),
            _ => trace!(?key, "ignored"),
        }

        Action::Continue
    }

    // -- Rendering ----------------------------------------------------------

    /// Scroll to the cursor and write the frame as of `now`.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn render_at(&mut self, out: &mut impl io::Write, now: Instant) -> io::Result<()> {
        self.viewport.scroll(&mut self.cursor, &self.document);
        self.message_shown = self.message.is_visible(now, self.options.message_timeout);
        view::render_frame(
            out,
            &self.document,
            &self.cursor,
            &self.viewport,
            &self.message,
            &self.options,
            now,
        )
    }

    /// Whether the message bar at `now` differs from the last frame.
    #[must_use]
    pub fn message_changed_at(&self, now: Instant) -> bool {
        self.message.is_visible(now, self.options.message_timeout) != self.message_shown
    }
}

impl App for Editor {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        self.process_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        self.viewport.resize(size);
    }

    fn on_tick(&mut self) -> bool {
        self.message_changed_at(Instant::now())
    }

    fn paint(&mut self, frame: &mut OutputBuffer) -> io::Result<()> {
        self.render_at(frame, Instant::now())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
