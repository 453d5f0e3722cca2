//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::encoding::TextEncoding;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// A record declares more bytes than the file has left
    #[error("record needs {needed} bytes but only {remaining} remain")]
    TruncatedRecord {
        /// Bytes the record declared
        needed: u64,
        /// Bytes left between the cursor and the end of the file
        remaining: u64,
    },

    /// An absolute offset points outside of the file
    #[error("offset {offset:#x} is outside of the file ({len} bytes)")]
    OffsetOutOfRange {
        /// The offending offset
        offset: i64,
        /// Length of the file
        len: u64,
    },

    /// Bytes could not be decoded with the active encoding
    #[error("text is not valid {encoding}")]
    #[diagnostic(help("the file may have been written with a different codepage"))]
    DecodeFailure {
        /// Encoding that rejected the bytes
        encoding: TextEncoding,
    },

    /// Encoded text does not fit in the length prefix
    #[error("string of {len} bytes does not fit a prefix of at most {max} bytes")]
    StringTooLong {
        /// Encoded length of the string
        len: usize,
        /// Largest length the prefix can express
        max: usize,
    },

    /// A variable-length prefix kept its continuation bit past the last allowed byte
    #[error("invalid variable-length string prefix")]
    InvalidLengthPrefix,

    /// The output grew past what a 32-bit offset can address
    #[error("file of {len} bytes can not be addressed with 32-bit offsets")]
    FileTooLarge {
        /// Size the file would have
        len: u64,
    },

    /// An offset table was patched before every slot was recorded
    #[error("offset table expected {expected} offsets but recorded {actual}")]
    IncompleteOffsetTable {
        /// Slots reserved in the file
        expected: usize,
        /// Offsets actually recorded
        actual: usize,
    },
}

impl Error {
    /// Whether this error only affects the record being read.
    ///
    /// Truncated records, out of range offsets and broken length prefixes are local
    /// damage: the caller can substitute a fallback and keep going. Anything else
    /// invalidates the parse.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::TruncatedRecord { .. }
                | Error::OffsetOutOfRange { .. }
                | Error::InvalidLengthPrefix
        ) || matches!(self, Error::IOError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
