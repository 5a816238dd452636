//! Document — the ordered rows of one file plus its name.
//!
//! Files are read as plain bytes: no encoding detection, no conversion.
//! Lines end at `\n`; any trailing `\n`/`\r` bytes are stripped, so both
//! LF and CRLF files load cleanly. A final line without a terminator is
//! still a line, and an empty file has no rows at all.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::row::Row;

/// The rows being viewed.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    filename: Option<PathBuf>,
    tab_stop: usize,
}

impl Document {
    /// An empty, unnamed document.
    #[must_use]
    pub const fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            filename: None,
            tab_stop,
        }
    }

    /// Load a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened or read.
    pub fn open(path: &Path, tab_stop: usize) -> Result<Self, Error> {
        let open_err = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_err)?;
        let mut doc = Self::from_reader(BufReader::new(file), tab_stop).map_err(open_err)?;
        doc.filename = Some(path.to_path_buf());

        debug!(path = %path.display(), rows = doc.len(), "file loaded");
        Ok(doc)
    }

    /// Read rows from any buffered reader.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn from_reader(mut reader: impl BufRead, tab_stop: usize) -> io::Result<Self> {
        let mut doc = Self::new(tab_stop);
        let mut line = Vec::new();

        while reader.read_until(b'\n', &mut line)? > 0 {
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            doc.append_row(&line);
            line.clear();
        }

        Ok(doc)
    }

    /// Build a document from in-memory text.
    #[must_use]
    pub fn from_bytes(text: &[u8], tab_stop: usize) -> Self {
        let mut doc = Self::new(tab_stop);
        for line in text.split_inclusive(|&b| b == b'\n') {
            let end = line
                .iter()
                .rposition(|&b| b != b'\n' && b != b'\r')
                .map_or(0, |i| i + 1);
            doc.append_row(&line[..end]);
        }
        doc
    }

    /// Append a row built from `bytes` (terminator already stripped).
    pub fn append_row(&mut self, bytes: &[u8]) {
        self.rows.push(Row::new(bytes, self.tab_stop));
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Logical length of row `index`, or 0 past the last row.
    #[must_use]
    pub fn row_len(&self, index: usize) -> usize {
        self.row(index).map_or(0, Row::len)
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The path this document was loaded from.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Name the document, as shown in the status bar.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.filename = Some(path.into());
    }

    /// Tab stop used for rendering.
    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Render column of logical column `cx` on row `cy`, or 0 past the
    /// last row.
    #[must_use]
    pub fn cx_to_rx(&self, cy: usize, cx: usize) -> usize {
        self.row(cy).map_or(0, |row| row.cx_to_rx(cx, self.tab_stop))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
