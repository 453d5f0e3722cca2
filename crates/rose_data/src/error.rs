//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`rose_stb::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    StbError(#[from] rose_stb::error::Error),

    /// Transparent warpper for [`rose_stl::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    StlError(#[from] rose_stl::error::Error),

    /// A required table file does not exist
    #[error("required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file is neither a STB nor a STL table
    #[error("unsupported file type {extension:?} for {}", .path.display())]
    #[diagnostic(help("only .STB and .STL files can be loaded"))]
    UnsupportedFileType {
        /// File that was requested
        path: PathBuf,
        /// Its extension, empty if it has none
        extension: String,
    },

    /// The data directory has no STB folder
    #[error("STB folder not found in {}", .0.display())]
    #[diagnostic(help("select the 3DDATA folder of the client"))]
    StbDirectoryMissing(PathBuf),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
