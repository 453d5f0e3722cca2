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

    /// Transparent warpper for [`rose_record::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    RecordError(#[from] rose_record::error::Error),

    /// The entry directory declares a negative number of entries
    #[error("invalid entry count {0}")]
    InvalidEntryCount(i32),

    /// The language count is not positive or implausibly large
    #[error("invalid language count {0}")]
    InvalidLanguageCount(i32),

    /// The table has never been loaded from or saved to a path
    #[error("string table has no path to save to")]
    NoPath,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
