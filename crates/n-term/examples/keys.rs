// SPDX-License-Identifier: MIT
//
// n-term keys — a live view of decoded key events.
//
// Enters raw mode through the event loop and lists every key the decoder
// produces, newest at the bottom, with the window size in the header.
// Handy for checking what a terminal actually sends for Home, End and
// friends. Ctrl-Q to quit.
//
// Usage:
//   cargo run -p n-term --example keys

use std::collections::VecDeque;
use std::io::{self, Write};

use n_term::ansi;
use n_term::event_loop::{Action, App, EventLoop};
use n_term::input::KeyEvent;
use n_term::output::OutputBuffer;
use n_term::terminal::Size;

/// Keys kept in the log.
const MAX_LOG_ENTRIES: usize = 200;

struct Keys {
    size: Size,
    log: VecDeque<String>,
    count: u64,
}

impl App for Keys {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.is_ctrl('q') {
            return Action::Quit;
        }
        self.count += 1;
        if self.log.len() == MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(format!("{:>5}  {key:?}", self.count));
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
    }

    fn paint(&mut self, frame: &mut OutputBuffer) -> io::Result<()> {
        let rows = usize::from(self.size.rows);
        let cols = usize::from(self.size.cols);

        ansi::cursor_hide(frame)?;
        ansi::cursor_home(frame)?;

        let header = format!(
            " n-term keys  {}x{}  {} keys  (Ctrl-Q quits)",
            self.size.cols, self.size.rows, self.count
        );
        ansi::inverse(frame)?;
        write!(frame, "{:cols$.cols$}", header)?;
        ansi::reset(frame)?;

        let body = rows.saturating_sub(1);
        let skip = self.log.len().saturating_sub(body);
        for y in 0..body {
            frame.push_bytes(b"\r\n");
            if let Some(line) = self.log.get(skip + y) {
                write!(frame, "{:.cols$}", line)?;
            }
            ansi::erase_line(frame)?;
        }

        Ok(())
    }
}

fn main() {
    let mut app = Keys {
        size: Size { cols: 80, rows: 24 },
        log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        count: 0,
    };

    if let Err(e) = EventLoop::run(&mut app) {
        eprintln!("keys: {e}");
        std::process::exit(1);
    }
}
