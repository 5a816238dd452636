//! Row — one line of the document in logical and rendered form.
//!
//! A row keeps two byte strings:
//!
//! - **`chars`** — the line exactly as it appeared in the file, minus the
//!   line terminator. Cursor columns (`cx`) index into this.
//! - **`render`** — `chars` with every tab expanded to spaces up to the
//!   next tab stop. Screen columns (`rx`) index into this.
//!
//! `render` is a pure function of `chars` and the tab stop. Every
//! constructor computes it, and [`Row::update`] recomputes it.
//!
//! ```text
//! chars   a \t b            cx: 0 1 2
//! render  a _ _ _ _ _ _ _ b rx: 0 1 . . . . . . 8
//! ```

/// Tab stop width used when nothing else is configured.
pub const DEFAULT_TAB_STOP: usize = 8;

/// A single line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    /// Build a row from raw line bytes (no trailing newline).
    #[must_use]
    pub fn new(chars: impl Into<Vec<u8>>, tab_stop: usize) -> Self {
        let chars = chars.into();
        let render = expand_tabs(&chars, tab_stop);
        Self { chars, render }
    }

    /// The logical content.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// The tab-expanded content drawn on screen.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Logical length in bytes. The cursor may rest at `len()`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the row has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Rendered length in screen columns.
    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Recompute `render` from `chars`.
    pub fn update(&mut self, tab_stop: usize) {
        self.render = expand_tabs(&self.chars, tab_stop);
    }

    /// Map a logical column to its render column.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        cx_to_rx(&self.chars, cx, tab_stop)
    }

    /// The part of `render` visible from `col_offset`, at most `width`
    /// columns. Empty if the row ends before `col_offset`.
    #[must_use]
    pub fn visible(&self, col_offset: usize, width: usize) -> &[u8] {
        let start = col_offset.min(self.render.len());
        let end = start + width.min(self.render.len() - start);
        &self.render[start..end]
    }
}

/// Expand tabs to spaces, padding each to the next multiple of `tab_stop`.
///
/// A tab always produces at least one space.
#[must_use]
pub fn expand_tabs(chars: &[u8], tab_stop: usize) -> Vec<u8> {
    let tab_stop = tab_stop.max(1);
    let tabs = chars.iter().filter(|&&b| b == b'\t').count();
    let mut render = Vec::with_capacity(chars.len() + tabs * (tab_stop - 1));

    for &byte in chars {
        if byte == b'\t' {
            render.push(b' ');
            while render.len() % tab_stop != 0 {
                render.push(b' ');
            }
        } else {
            render.push(byte);
        }
    }

    render
}

/// Convert a logical column into a render column.
///
/// Each byte before `cx` advances the render column by one, except a tab,
/// which advances it to the next multiple of `tab_stop`. Columns past the
/// end of the line count as if the line stopped there.
#[must_use]
pub fn cx_to_rx(chars: &[u8], cx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    chars.iter().take(cx).fold(0, |rx, &byte| {
        if byte == b'\t' {
            (rx / tab_stop + 1) * tab_stop
        } else {
            rx + 1
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
