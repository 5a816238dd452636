// SPDX-License-Identifier: MIT
//
// Terminal errors.
//
// Everything here is a setup failure from the caller's point of view: the
// terminal cannot be put into raw mode, its geometry cannot be determined,
// or input/output to it failed outright. "No data yet" from a raw read is
// not an error and never reaches this type.

use std::io;

/// Errors raised by the terminal layer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading or writing the terminal attributes failed.
    #[error("{call}: {source}")]
    Attributes {
        /// The failing call (`tcgetattr` or `tcsetattr`).
        call: &'static str,
        #[source]
        source: io::Error,
    },

    /// Neither the window-size ioctl nor the cursor-report fallback
    /// produced a usable `rows;cols` pair.
    #[error("unable to determine terminal window size")]
    GeometryUnavailable,

    /// A read from the terminal failed with something other than a
    /// transient "no data yet" condition.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing output to the terminal failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias for terminal operations.
pub type Result<T> = std::result::Result<T, Error>;
