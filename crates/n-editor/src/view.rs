//! View — the frame renderer.
//!
//! [`render_frame`] turns the session state into the bytes of one complete
//! screen. It writes into any `impl Write`; the event loop hands it an
//! `OutputBuffer` so the whole frame reaches the terminal in one write.
//!
//! The screen layout:
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ text rows (or ~ past the end)      │ ← screen_rows rows
//! │ ...                                │
//! │ ~        n-view -- version x.y.z   │ ← banner, empty document only
//! │ ~                                  │
//! │ notes.txt - 42 lines         7/42  │ ← status bar (inverse)
//! │ HELP: Ctrl-Q = quit                │ ← message bar
//! └────────────────────────────────────┘
//! ```
//!
//! Every row is erased to the end of line after drawing, so nothing from
//! the previous frame survives, and the screen is never cleared as a
//! whole. The cursor stays hidden while the frame is drawn.
//!
//! Rendering is read-only: call [`Viewport::scroll`] first so the cursor's
//! render column and the offsets are current.

use std::io::{self, Write};
use std::time::Instant;

use n_term::ansi;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::message::StatusMessage;
use crate::options::Options;
use crate::viewport::Viewport;

/// Shown in the status bar for a document with no file name.
pub const NO_NAME: &str = "[No Name]";

/// Longest file name shown in the status bar, in characters.
pub const MAX_STATUS_NAME: usize = 20;

/// Write one full frame.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn render_frame(
    out: &mut impl Write,
    doc: &Document,
    cursor: &Cursor,
    viewport: &Viewport,
    message: &StatusMessage,
    options: &Options,
    now: Instant,
) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    draw_rows(out, doc, viewport, &options.welcome)?;
    draw_status_bar(out, doc, cursor, viewport.screen_cols())?;
    draw_message_bar(
        out,
        message.visible_text(now, options.message_timeout),
        viewport.screen_cols(),
    )?;

    ansi::cursor_to(
        out,
        cursor.rx().saturating_sub(viewport.col_offset()),
        cursor.cy().saturating_sub(viewport.row_offset()),
    )?;
    ansi::cursor_show(out)
}

/// Draw the text area: file rows, tildes past the end, and the banner.
fn draw_rows(
    out: &mut impl Write,
    doc: &Document,
    viewport: &Viewport,
    welcome: &str,
) -> io::Result<()> {
    let rows = viewport.screen_rows();
    let cols = viewport.screen_cols();

    for y in 0..rows {
        let file_row = y + viewport.row_offset();

        if let Some(row) = doc.row(file_row) {
            out.write_all(row.visible(viewport.col_offset(), cols))?;
        } else if doc.is_empty() && y == rows / 3 {
            draw_banner(out, welcome, cols)?;
        } else {
            out.write_all(b"~")?;
        }

        ansi::erase_line(out)?;
        out.write_all(b"\r\n")?;
    }

    Ok(())
}

/// The welcome banner, centered, with the tilde kept in the first column.
fn draw_banner(out: &mut impl Write, welcome: &str, cols: usize) -> io::Result<()> {
    let text = truncate(welcome, cols);
    let mut padding = (cols - text.chars().count()) / 2;

    if padding > 0 {
        out.write_all(b"~")?;
        padding -= 1;
    }
    write!(out, "{:padding$}{text}", "")
}

/// Inverse-video bar: file name and line count on the left, cursor line on
/// the right. The right side is only drawn if it fits after the left.
fn draw_status_bar(
    out: &mut impl Write,
    doc: &Document,
    cursor: &Cursor,
    cols: usize,
) -> io::Result<()> {
    let name = doc
        .filename()
        .map_or_else(|| NO_NAME.into(), |p| p.to_string_lossy());
    let left = format!("{name:.max$} - {} lines", doc.len(), max = MAX_STATUS_NAME);
    let right = format!("{}/{}", cursor.cy() + 1, doc.len());

    let left = truncate(&left, cols);
    let left_len = left.chars().count();
    let right_len = right.chars().count();

    ansi::inverse(out)?;
    out.write_all(left.as_bytes())?;
    if left_len + right_len <= cols {
        let gap = cols - left_len - right_len;
        write!(out, "{:gap$}{right}", "")?;
    } else {
        let gap = cols - left_len;
        write!(out, "{:gap$}", "")?;
    }
    ansi::reset(out)?;
    out.write_all(b"\r\n")
}

/// The bottom line: the status message while it is fresh, otherwise blank.
fn draw_message_bar(out: &mut impl Write, text: Option<&str>, cols: usize) -> io::Result<()> {
    ansi::erase_line(out)?;
    if let Some(text) = text {
        out.write_all(truncate(text, cols).as_bytes())?;
    }
    Ok(())
}

/// The longest prefix of `s` that is at most `max` characters.
fn truncate(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use n_term::terminal::Size;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const PREFIX: &str = "\x1b[?25l\x1b[H";

    fn options() -> Options {
        Options {
            welcome: "n-view -- version 1.2.3".into(),
            ..Options::default()
        }
    }

    /// Render and split the frame into screen lines, without the leading
    /// hide/home sequence.
    fn render(
        doc: &Document,
        cursor: &mut Cursor,
        viewport: &mut Viewport,
        message: &StatusMessage,
        now: Instant,
    ) -> Vec<String> {
        viewport.scroll(cursor, doc);
        let mut out = Vec::new();
        render_frame(&mut out, doc, cursor, viewport, message, &options(), now).unwrap();
        let text = String::from_utf8(out).unwrap();
        let body = text.strip_prefix(PREFIX).expect("frame starts hidden at home");
        body.split("\r\n").map(str::to_string).collect()
    }

    fn empty_frame(size: Size) -> Vec<String> {
        render(
            &Document::new(8),
            &mut Cursor::new(),
            &mut Viewport::from_size(size),
            &StatusMessage::new(),
            Instant::now(),
        )
    }

    // ── Text rows ────────────────────────────────────────────────────────

    #[test]
    fn banner_on_empty_document() {
        let lines = empty_frame(Size { cols: 80, rows: 24 });
        // 22 text rows, status bar, message bar.
        assert_eq!(lines.len(), 24);

        // 22 / 3 = 7: the eighth line.
        let banner = "n-view -- version 1.2.3";
        let padding = (80 - banner.len()) / 2;
        let expected = format!("~{}{banner}\x1b[K", " ".repeat(padding - 1));
        assert_eq!(lines[7], expected);

        for (y, line) in lines[..22].iter().enumerate() {
            if y != 7 {
                assert_eq!(line, "~\x1b[K", "row {y}");
            }
        }
    }

    #[test]
    fn banner_truncated_on_narrow_screen() {
        let lines = empty_frame(Size { cols: 10, rows: 8 });
        // 6 text rows → banner on row 2, no room for padding or tilde.
        assert_eq!(lines[2], "n-view -- \x1b[K");
    }

    #[test]
    fn no_banner_when_document_has_rows() {
        let doc = Document::from_bytes(b"only line\n", 8);
        let lines = render(
            &doc,
            &mut Cursor::new(),
            &mut Viewport::new(6, 40),
            &StatusMessage::new(),
            Instant::now(),
        );
        assert_eq!(lines[0], "only line\x1b[K");
        for line in &lines[1..6] {
            assert_eq!(line, "~\x1b[K");
        }
    }

    #[test]
    fn rows_are_tab_expanded_and_clipped() {
        let doc = Document::from_bytes(b"a\tb\n0123456789abcdef\n", 8);
        let lines = render(
            &doc,
            &mut Cursor::new(),
            &mut Viewport::new(2, 12),
            &StatusMessage::new(),
            Instant::now(),
        );
        assert_eq!(lines[0], "a       b\x1b[K");
        assert_eq!(lines[1], "0123456789ab\x1b[K");
    }

    #[test]
    fn horizontal_offset_hides_short_rows() {
        let doc = Document::from_bytes(b"short\n0123456789abcdef\n", 8);
        let mut cursor = Cursor::at(14, 1);
        let mut viewport = Viewport::new(2, 8);
        let lines = render(
            &doc,
            &mut cursor,
            &mut viewport,
            &StatusMessage::new(),
            Instant::now(),
        );
        assert_eq!(viewport.col_offset(), 7);
        assert_eq!(lines[0], "\x1b[K");
        assert_eq!(lines[1], "789abcde\x1b[K");
    }

    // ── Status bar ───────────────────────────────────────────────────────

    #[test]
    fn status_bar_fills_width() {
        let lines = empty_frame(Size { cols: 40, rows: 5 });
        let status = &lines[3];
        let inner = status
            .strip_prefix("\x1b[7m")
            .and_then(|s| s.strip_suffix("\x1b[m"))
            .unwrap();
        assert_eq!(inner.len(), 40);
        assert!(inner.starts_with("[No Name] - 0 lines"));
        assert!(inner.ends_with("1/0"));
    }

    #[test]
    fn status_bar_truncates_long_name() {
        let mut doc = Document::from_bytes(b"x\ny\n", 8);
        doc.set_filename("a/very/long/path/to/some/file.txt");
        let lines = render(
            &doc,
            &mut Cursor::at(0, 1),
            &mut Viewport::new(2, 50),
            &StatusMessage::new(),
            Instant::now(),
        );
        let left = "a/very/long/path/to/ - 2 lines";
        let expected = format!("\x1b[7m{left}{}2/2\x1b[m", " ".repeat(17));
        assert_eq!(lines[2], expected);
    }

    #[test]
    fn status_bar_drops_right_text_when_narrow() {
        let lines = empty_frame(Size { cols: 20, rows: 4 });
        assert_eq!(lines[2], "\x1b[7m[No Name] - 0 lines \x1b[m");
    }

    // ── Message bar ──────────────────────────────────────────────────────

    #[test]
    fn fresh_message_is_drawn() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("HELP: Ctrl-Q = quit", t0);
        let lines = render(
            &Document::new(8),
            &mut Cursor::new(),
            &mut Viewport::new(1, 80),
            &msg,
            t0 + Duration::from_secs(1),
        );
        assert_eq!(lines[2], "\x1b[KHELP: Ctrl-Q = quit\x1b[1;1H\x1b[?25h");
    }

    #[test]
    fn expired_message_is_blank() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("gone soon", t0);
        let lines = render(
            &Document::new(8),
            &mut Cursor::new(),
            &mut Viewport::new(1, 80),
            &msg,
            t0 + Duration::from_secs(6),
        );
        assert_eq!(lines[2], "\x1b[K\x1b[1;1H\x1b[?25h");
    }

    #[test]
    fn message_truncated_to_width() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("0123456789", t0);
        let lines = render(
            &Document::new(8),
            &mut Cursor::new(),
            &mut Viewport::new(1, 4),
            &msg,
            t0,
        );
        assert!(lines[2].starts_with("\x1b[K0123\x1b["));
    }

    // ── Cursor placement ─────────────────────────────────────────────────

    #[test]
    fn cursor_placed_relative_to_offsets() {
        let text: String = (0..100).map(|i| format!("\tline {i}\n")).collect();
        let doc = Document::from_bytes(text.as_bytes(), 8);
        let mut cursor = Cursor::at(1, 50);
        let mut viewport = Viewport::new(20, 80);
        let lines = render(
            &doc,
            &mut cursor,
            &mut viewport,
            &StatusMessage::new(),
            Instant::now(),
        );
        assert_eq!(viewport.row_offset(), 31);
        // Row 50 is screen row 19; cx 1 after a tab is rx 8.
        assert!(lines[21].ends_with("\x1b[20;9H\x1b[?25h"));
    }

    #[test]
    fn frame_is_the_same_twice() {
        let doc = Document::from_bytes(b"one\ntwo\n", 8);
        let now = Instant::now();
        let mut cursor = Cursor::at(1, 1);
        let mut viewport = Viewport::new(3, 10);
        let first = render(&doc, &mut cursor, &mut viewport, &StatusMessage::new(), now);
        let second = render(&doc, &mut cursor, &mut viewport, &StatusMessage::new(), now);
        assert_eq!(first, second);
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abc", 0), "");
    }
}
