//! Error types that can be emitted from this library

use std::io::{self, Read, Seek, SeekFrom};

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// {format} has an invalid magic value, expected {expected} got {found}
    #[error("{format} has an invalid magic value, expected {expected} got {found}")]
    #[diagnostic(help("the file is not a {format} or it is truncated"))]
    HeaderMismatch {
        /// Name of the format being decoded
        format: &'static str,
        /// Magic value the format requires
        expected: String,
        /// Magic value read from the input
        found: String,
    },

    /// field {field} is malformed: {reason}
    #[error("field {field} is malformed: {reason}")]
    MalformedField {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// path hash mismatch for {path}, computed={computed:#010x} stored={stored:#010x}
    #[error("path hash mismatch for {path}, computed={computed:#010x} stored={stored:#010x}")]
    #[diagnostic(help("the archive index is corrupt"))]
    HashMismatch {
        /// Path resolved from the path table
        path: String,
        /// Hash computed from `path`
        computed: u32,
        /// Hash stored in the entry record
        stored: u32,
    },

    /// unable to decompress payload: {0}
    #[error("unable to decompress payload: {0}")]
    CorruptData(std::io::Error),

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

impl Error {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Error::MalformedField {
            field,
            reason: reason.into(),
        }
    }

    /// Convert an error raised while reading a header carrying `expected` as its magic value.
    ///
    /// On a magic mismatch the bytes found are read back from `reader` so both values show as byte strings.
    pub(crate) fn from_header<R: Read + Seek>(
        err: binrw::Error,
        reader: &mut R,
        format: &'static str,
        expected: &[u8],
    ) -> Self {
        match err {
            binrw::Error::BadMagic { pos, .. } => {
                let mut found = vec![0; expected.len()];
                if let Err(err) = reader
                    .seek(SeekFrom::Start(pos))
                    .and_then(|_| reader.read_exact(&mut found))
                {
                    return Error::IOError(err);
                }
                Error::HeaderMismatch {
                    format,
                    expected: format!("b\"{}\"", expected.escape_ascii()),
                    found: format!("b\"{}\"", found.escape_ascii()),
                }
            }
            binrw::Error::Backtrace(backtrace) => Self::from_header(*backtrace.error, reader, format, expected),
            err => Error::from(err),
        }
    }

    /// Convert an error raised while reading the tables following a header.
    ///
    /// Running out of input in the middle of a table means the file is truncated, which is reported against
    /// `table` instead of as an unreadable source.
    pub(crate) fn from_table(err: binrw::Error, table: &'static str) -> Self {
        match err {
            binrw::Error::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Error::malformed(table, "the input ends before the table is complete")
            }
            binrw::Error::Backtrace(backtrace) => Self::from_table(*backtrace.error, table),
            err => Error::from(err),
        }
    }
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value {
            binrw::Error::Backtrace(backtrace) => Error::from(*backtrace.error),
            binrw::Error::Io(err) => Error::IOError(err),
            err => Error::BinRWError(err),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
