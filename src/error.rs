// Copyright 2014-2016 Johannes Köster, Taylor Cramer.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Error type shared by ingestion and persistence. Backward search itself
//! is total (see `search`) and never returns `Error`.

use std::path::PathBuf;

/// Failures that can occur while reading a FASTA/raw file or while
/// saving/loading a persisted index.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid alphabet byte {byte:#04x} at position {position} (expected one of A, C, G, T, N)")]
    InvalidAlphabet { byte: u8, position: usize },

    #[error("truncated index file {path}: expected {expected} bytes, found {found}")]
    TruncatedIndex {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("malformed manifest line: {line}")]
    MalformedManifest { line: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
