//! Errors raised while setting up a viewing session.

use std::io;
use std::path::PathBuf;

/// Errors from loading a document or applying options.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The file could not be opened or read.
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An option name that does not exist.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A known option given a value it cannot take.
    #[error("invalid value for {name}: {value}")]
    InvalidOption { name: String, value: String },
}
