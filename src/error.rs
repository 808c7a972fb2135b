//! Errors raised while converting a graph.

use crate::format::Format;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The format selection could not be understood.
    #[error("Invalid format selection: {0}")]
    InvalidArguments(String),
    #[error("Cannot open input {}: {source}", path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot create {format} output {}: {source}", path.display())]
    OutputCreate {
        format: Format,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A missing or non-numeric field, an index out of range, a decreasing
    /// row, or a premature end of input.
    #[error("Malformed input at line {line}: {reason}")]
    MalformedInputLine { line: usize, reason: String },
    #[error("Cannot allocate the row buffer ({0} entries)")]
    Allocation(usize),
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInputLine {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
