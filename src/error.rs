// SPDX-License-Identifier: (Apache-2.0 OR MIT)

use std::io;
use std::path::PathBuf;

/// Every failure the scanner can run into. None of them is recoverable: the
/// file being scanned is abandoned, and with it the run unless
/// [`Config::keep_going`](crate::Config::keep_going) is set.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error opening binary {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Truncated file: {0}")]
    TruncatedFile(&'static str),

    #[error("Invalid ELF file: bad magic bytes")]
    InvalidFormat,

    #[error("Invalid binary, expected 32 or 64 bit little or big endian ({field} = {value:#x})")]
    UnsupportedFormat { field: &'static str, value: u8 },

    #[error("Malformed ELF file: {0}")]
    Malformed(#[from] goblin::error::Error),

    #[error("Error allocating {size} bytes to store the binary's read-only data")]
    Allocation { size: u64 },

    #[error("Spell checker configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
