//! Cursor — position tracking and movement.
//!
//! The cursor lives in logical space: `cy` is a row index and `cx` a byte
//! index into that row's `chars`. `rx`, the matching render column, is
//! derived and refreshed by [`Cursor::update_rx`] before every frame.
//!
//! # Resting positions
//!
//! - `cy` ranges over `0..=doc.len()`. `cy == doc.len()` is the row just
//!   past the end of the document, which always has length 0.
//! - `cx` ranges over `0..=row_len(cy)`, so the cursor may sit just after
//!   the last byte of a line but never further.
//!
//! Every movement method leaves the cursor in a resting position. Vertical
//! moves clamp `cx` to the length of the row they land on.
//!
//! The cursor does not hold the document; it is passed to each movement
//! method instead.

use crate::document::Document;
use crate::row::Row;
use crate::viewport::Viewport;

/// A single-step movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// A cursor in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    cx: usize,
    cy: usize,
    rx: usize,
}

impl Cursor {
    /// A cursor at the top-left.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0, rx: 0 }
    }

    /// A cursor at logical column `cx` of row `cy`.
    ///
    /// The position is taken as given. Call [`clamp`](Self::clamp) to fit
    /// it to a document.
    #[must_use]
    pub const fn at(cx: usize, cy: usize) -> Self {
        Self { cx, cy, rx: 0 }
    }

    // -- Accessors ----------------------------------------------------------

    /// Logical column.
    #[inline]
    #[must_use]
    pub const fn cx(&self) -> usize {
        self.cx
    }

    /// Row index.
    #[inline]
    #[must_use]
    pub const fn cy(&self) -> usize {
        self.cy
    }

    /// Render column, as of the last [`update_rx`](Self::update_rx).
    #[inline]
    #[must_use]
    pub const fn rx(&self) -> usize {
        self.rx
    }

    // -- Derived state ------------------------------------------------------

    /// Recompute `rx` from `cx` and the current row.
    pub fn update_rx(&mut self, doc: &Document) {
        self.rx = doc.cx_to_rx(self.cy, self.cx);
    }

    /// Pull the cursor back into a resting position in `doc`.
    pub fn clamp(&mut self, doc: &Document) {
        self.cy = self.cy.min(doc.len());
        self.cx = self.cx.min(doc.row_len(self.cy));
    }

    // -- Movement -----------------------------------------------------------

    /// Move one step.
    ///
    /// Left at column 0 wraps to the end of the previous row, and Right at
    /// the end of a row wraps to the start of the next. Up stops at the
    /// first row, Down at the row past the end.
    pub fn step(&mut self, dir: Direction, doc: &Document) {
        let row_len = doc.row(self.cy).map(Row::len);

        match dir {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = doc.row_len(self.cy);
                }
            }
            Direction::Right => match row_len {
                Some(len) if self.cx < len => self.cx += 1,
                Some(len) if self.cx == len => {
                    self.cy += 1;
                    self.cx = 0;
                }
                _ => {}
            },
            Direction::Up => {
                self.cy = self.cy.saturating_sub(1);
            }
            Direction::Down => {
                if self.cy < doc.len() {
                    self.cy += 1;
                }
            }
        }

        self.clamp(doc);
    }

    /// Move to column 0.
    pub const fn home(&mut self) {
        self.cx = 0;
    }

    /// Move past the last byte of the current row. No effect past the
    /// last row.
    pub fn end(&mut self, doc: &Document) {
        if let Some(row) = doc.row(self.cy) {
            self.cx = row.len();
        }
    }

    /// Scroll up a page: jump to the top of the window, then step up once
    /// per screen row.
    pub fn page_up(&mut self, doc: &Document, viewport: &Viewport) {
        self.cy = viewport.row_offset();
        self.clamp(doc);
        for _ in 0..viewport.screen_rows() {
            self.step(Direction::Up, doc);
        }
    }

    /// Scroll down a page: jump to the bottom of the window, then step down
    /// once per screen row.
    pub fn page_down(&mut self, doc: &Document, viewport: &Viewport) {
        let bottom = (viewport.row_offset() + viewport.screen_rows()).saturating_sub(1);
        self.cy = bottom.min(doc.len());
        self.clamp(doc);
        for _ in 0..viewport.screen_rows() {
            self.step(Direction::Down, doc);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
