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

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`rose_record::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    RecordError(#[from] rose_record::error::Error),

    /// file is not a STB1 data table
    #[error("file is not a STB1 data table")]
    #[diagnostic(help("STB files start with the bytes `STB1`"))]
    InvalidMagic,

    /// The header declares a table without a header row or row-name column
    #[error("invalid table dimensions of {rows} rows by {columns} columns")]
    InvalidDimensions {
        /// Declared rows, including the header row
        rows: usize,
        /// Declared columns, including the row-name column
        columns: usize,
    },

    /// The table has never been loaded from or saved to a path
    #[error("data table has no path to save to")]
    NoPath,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
