//! Viewport — the visible window onto the document.
//!
//! The viewport is the rectangle `[row_offset, row_offset + screen_rows) ×
//! [col_offset, col_offset + screen_cols)` in (row, render column) space.
//! [`Viewport::scroll`] runs before every frame and moves that rectangle
//! just far enough to contain the cursor.
//!
//! Each of the four checks is a clamp, never a reset: the offsets move only
//! when the cursor has left the window, and only by the minimum amount.

use n_term::terminal::Size;

use crate::cursor::Cursor;
use crate::document::Document;

/// Terminal rows taken by the status bar and the message bar.
pub const RESERVED_ROWS: usize = 2;

/// Scroll offsets and visible dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    row_offset: usize,
    col_offset: usize,
    screen_rows: usize,
    screen_cols: usize,
}

impl Viewport {
    /// A viewport showing `screen_rows` text rows and `screen_cols` columns,
    /// scrolled to the top-left.
    #[must_use]
    pub const fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows,
            screen_cols,
        }
    }

    /// A viewport for a terminal of the given size, leaving room for the
    /// two bars at the bottom.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        let mut viewport = Self::default();
        viewport.resize(size);
        viewport
    }

    /// Adopt a new terminal size, keeping the current offsets.
    pub fn resize(&mut self, size: Size) {
        self.screen_rows = usize::from(size.rows).saturating_sub(RESERVED_ROWS);
        self.screen_cols = usize::from(size.cols);
    }

    /// Set the offsets directly.
    #[must_use]
    pub const fn with_offsets(mut self, row_offset: usize, col_offset: usize) -> Self {
        self.row_offset = row_offset;
        self.col_offset = col_offset;
        self
    }

    // -- Accessors ----------------------------------------------------------

    /// First document row on screen.
    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First render column on screen.
    #[inline]
    #[must_use]
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Number of text rows (excludes the two bars).
    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    /// Whether `(row, rx)` falls inside the window.
    #[must_use]
    pub const fn contains(&self, row: usize, rx: usize) -> bool {
        row >= self.row_offset
            && row < self.row_offset + self.screen_rows
            && rx >= self.col_offset
            && rx < self.col_offset + self.screen_cols
    }

    // -- Scrolling ----------------------------------------------------------

    /// Refresh the cursor's render column, then move the window so the
    /// cursor is inside it.
    ///
    /// A zero-sized dimension has no room for the cursor; its offset is
    /// left alone.
    pub fn scroll(&mut self, cursor: &mut Cursor, doc: &Document) {
        cursor.update_rx(doc);
        let (cy, rx) = (cursor.cy(), cursor.rx());

        if self.screen_rows > 0 {
            if cy < self.row_offset {
                self.row_offset = cy;
            }
            if cy >= self.row_offset + self.screen_rows {
                self.row_offset = cy - self.screen_rows + 1;
            }
        }

        if self.screen_cols > 0 {
            if rx < self.col_offset {
                self.col_offset = rx;
            }
            if rx >= self.col_offset + self.screen_cols {
                self.col_offset = rx - self.screen_cols + 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
