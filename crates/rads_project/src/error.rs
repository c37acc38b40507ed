//! Error types that can be emitted from this library
//!

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for errors decoding binary manifests and archives
    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] rads_formats::error::Error),

    /// Transparent wrapper for errors reading text manifests
    #[error(transparent)]
    #[diagnostic(transparent)]
    Solution(#[from] rads_solution::error::Error),

    /// unable to open {path}
    #[error("unable to open {}", path.display())]
    #[diagnostic(help("check that the release is fully installed"))]
    Open {
        /// The file that could not be opened
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// unable to write {path}
    #[error("unable to write {}", path.display())]
    Write {
        /// The file that could not be written
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// {path} is not inside a RADS installation: {reason}
    #[error("{} is not inside a RADS installation: {reason}", path.display())]
    Layout {
        /// The offending path
        path: PathBuf,
        /// What is missing
        reason: &'static str,
    },

    /// unable to find requested item
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

/// Error type to provide further information when something has not been found
#[derive(Error, Diagnostic, Debug)]
pub enum NotFoundError {
    /// The release manifest does not list the path
    #[error("{0} is not part of the release")]
    Path(String),

    /// The archive named by the file's version does not hold the path
    #[error("{path} is not stored in {}", archive.display())]
    ArchiveEntry {
        /// The requested path
        path: String,
        /// The archive index that was searched
        archive: PathBuf,
    },

    /// The solution has no configuration with that name
    #[error("solution has no configuration named {0}")]
    Configuration(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
