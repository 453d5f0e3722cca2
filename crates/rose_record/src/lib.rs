//! This library holds the primitives shared by the **STB** and **STL** table formats used by
//! *ROSE Online*.
//!
//! # Offset-Indexed Records
//!
//! Both formats store variable-length records somewhere in the file and locate them through
//! arrays of 32-bit little-endian offsets. Offsets are always absolute from the start of the
//! file.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | `table`        | Offsets                | `count` × 4 bytes: absolute offset of each record          |
//! | `offsets[i]`   | Record                 | Variable length payload of record `i`                      |
//!
//! Because the length of a record is only known once it has been written, writers reserve
//! the offset array as zeroes, write every record while remembering where it started and then
//! seek back to fill in the array (see [`RecordWriter::patch`]).
//!
//! ## Strings
//!
//! Strings are stored as a byte length followed by the encoded bytes. The width of the length
//! depends on the format (see [`LengthPrefix`]). The length always counts encoded bytes: the
//! text is stored in a regional multi-byte codepage (see [`TextEncoding`]).
//!

pub mod encoding;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use encoding::TextEncoding;
pub use read::RecordReader;
pub use types::{LengthPrefix, LoadOptions, Recovered};
pub use write::{OffsetTable, RecordWriter};
