//! Error types for the OBJ splitter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for split operations.
pub type SplitResult<T> = Result<T, SplitError>;

/// Errors that stop a split run.
///
/// None of these are recovered from. Segment files written before the
/// failure stay on disk.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The input document could not be read (missing, unreadable, not UTF-8).
    #[error("cannot read input document {}: {source}", path.display())]
    InputNotFound {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An `object` marker line without a third space-separated field.
    #[error("malformed object marker on line {line_number}: {line:?} (expected `<tag> object <name>`)")]
    MalformedMarker {
        /// 1-based line number in the input document.
        line_number: usize,
        /// The offending line, verbatim.
        line: String,
    },

    /// A marker name that cannot be used as an output file name.
    #[error("segment name {name:?} on line {line_number} is not a valid file name")]
    InvalidSegmentName {
        /// 1-based line number in the input document.
        line_number: usize,
        /// The extracted name.
        name: String,
    },

    /// The output directory or a segment file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    OutputWriteFailure {
        /// Directory or file being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    /// Wraps an I/O error raised while reading `path`.
    pub fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SplitError::InputNotFound {
            path: path.into(),
            source,
        }
    }

    /// Wraps an I/O error raised while writing `path`.
    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SplitError::OutputWriteFailure {
            path: path.into(),
            source,
        }
    }
}
