//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// line {line}: expected {expected:?}, got {found:?}
    #[error("line {line}: expected {expected:?}, got {found:?}")]
    HeaderMismatch {
        /// Line number, starting from 1
        line: usize,
        /// The line the format requires
        expected: &'static str,
        /// The line that was read
        found: String,
    },

    /// line {line}: {field} format error, got {found:?}
    #[error("line {line}: {field} format error, got {found:?}")]
    MalformedField {
        /// Line number, starting from 1
        line: usize,
        /// Name of the offending field
        field: &'static str,
        /// The value that was read
        found: String,
    },

    /// line {line}: empty {field}
    #[error("line {line}: empty {field}")]
    EmptyField {
        /// Line number, starting from 1
        line: usize,
        /// Name of the offending field
        field: &'static str,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
