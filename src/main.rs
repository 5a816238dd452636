// SPDX-License-Identifier: MIT
//
// n-view — a small raw-mode terminal text viewer.
//
// This is the binary that wires the two crates together:
//
//   n-term   → raw mode, window size, key decoding, event loop
//   n-editor → rows, cursor, viewport, frame rendering
//
// Startup runs in a fixed order so every failure is reported on a sane
// terminal:
//
//   args → logging → options → open file → raw mode → event loop
//
// The file is opened before raw mode is entered. Once the event loop owns
// the terminal it also owns cleanup: whatever happens, the screen is
// cleared and the original terminal attributes are restored before `run`
// returns.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use n_editor::Editor;
use n_editor::document::Document;
use n_editor::options::{OPTIONS_ENV, Options};
use n_term::event_loop::EventLoop;

/// Names the log file. Without it nothing is logged.
const LOG_ENV: &str = "N_VIEW_LOG";

/// Shown in the message bar at startup.
const HELP_MESSAGE: &str = "HELP: Ctrl-Q = quit";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "n-view", version, about = "A small raw-mode terminal text viewer")]
struct Args {
    /// File to view. Without it, an empty document is shown.
    path: Option<PathBuf>,
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send tracing output to the file named by `N_VIEW_LOG`, if set.
///
/// The terminal is in raw mode while we run, so logs never go to stdout
/// or stderr. The returned guard flushes the writer when dropped.
fn init_logging() -> Option<WorkerGuard> {
    let path = PathBuf::from(env::var_os(LOG_ENV)?);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = path.file_name()?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// The first status message: the help line, followed by any option entries
/// that could not be applied.
fn startup_message(option_errors: &[n_editor::Error]) -> String {
    let mut message = HELP_MESSAGE.to_string();
    for err in option_errors {
        message.push_str(" | ");
        message.push_str(OPTIONS_ENV);
        message.push_str(": ");
        message.push_str(&err.to_string());
    }
    message
}

/// Load the document named on the command line, or an empty one.
fn load_document(path: Option<&Path>, options: &Options) -> Result<Document> {
    match path {
        Some(path) => Ok(Document::open(path, options.tab_stop)?),
        None => Ok(Document::new(options.tab_stop)),
    }
}

fn run(args: Args) -> Result<()> {
    let _log_guard = init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "n-view starting");

    let (options, option_errors) = Options::from_env();
    let document = load_document(args.path.as_deref(), &options)?;

    let mut editor = Editor::new(document, options);
    editor.set_status(startup_message(&option_errors));

    EventLoop::run(&mut editor).context("terminal")?;

    info!("n-view exiting");
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("n-view: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
