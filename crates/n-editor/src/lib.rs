//! # n-editor — Viewing core for n-view
//!
//! This crate holds the session state and everything that acts on it:
//!
//! - **[`row`]** — `Row`, one line in logical and tab-expanded form
//! - **[`document`]** — `Document`, the rows of one file plus its name
//! - **[`cursor`]** — `Cursor` with single-step, line and page movement
//! - **[`viewport`]** — `Viewport` offsets and the per-frame scroll clamp
//! - **[`message`]** — the timed status message
//! - **[`options`]** — `:set`-style options from the environment
//! - **[`view`]** — the frame renderer
//! - **[`editor`]** — `Editor`, the session the n-term event loop drives

pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod message;
pub mod options;
pub mod row;
pub mod view;
pub mod viewport;

pub use editor::Editor;
pub use error::Error;
