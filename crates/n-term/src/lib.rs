// SPDX-License-Identifier: MIT
//
// n-term — Terminal layer for n-view.
//
// Everything that touches the terminal device lives here: raw mode with
// guaranteed restore, window geometry, decoding keystrokes from raw bytes,
// and getting each frame onto the screen in a single write.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via VT100 escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
