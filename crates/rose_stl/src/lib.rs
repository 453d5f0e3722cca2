//! # STL Format Documentation
//!
//! This crate provides utilities to read, edit and write the **STL** string tables used by the
//! game *ROSE Online*. A STL file maps stable string ids to localized text in several languages.
//! STL files are typically identified with the `.stl` extension.
//!
//! ## File Structure
//!
//! Strings are prefixed with their encoded byte length as a 7-bit variable length integer (see
//! [`rose_record::LengthPrefix::VarInt`]). Every offset is absolute from the start of the file.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Type                   | string: `QEST01`, `ITST01` or any other tag                |
//! | ...            | Entry Count            | 4 bytes: signed number of entries `N`                      |
//! | ...            | Entries                | `N` × (string id, 4 byte numeric id)                       |
//! | ...            | Language Count         | 4 bytes: signed number of languages `L`                    |
//! | ...            | Language Offsets       | `L` × 4 bytes: offset of each language's entry offsets     |
//! | language[l]    | Entry Offsets          | `N` × 4 bytes: offset of each row of language `l`          |
//! | entry[l][i]    | Row                    | string fields, depending on the type                       |
//!
//! ### Rows
//!
//! The type tag fixes the fields of every row in the file:
//!
//! | Type       | Fields                                   |
//! |------------|------------------------------------------|
//! | `QEST01`   | text, comment, quest1, quest2            |
//! | `ITST01`   | text, comment                            |
//! | other      | text                                     |
//!
//! ## Damaged Files
//!
//! The client ships many tables with broken offsets. Reading never gives up on a single bad
//! record: an implausible language count is replaced with 2, a language offset of zero or past
//! the end of the file leaves that language empty, and a row that cannot be read is replaced
//! with an empty one. Each substitution is logged as a warning.
//!
//! Text is decoded strictly. If any string is invalid in the current encoding the whole file is
//! parsed again with the next one, in the order Korean, Japanese, Chinese (see
//! [`rose_record::LoadOptions`]). When no encoding decodes every row, the file is read once
//! more as the first candidate with the undecodable rows left empty. Files are always written
//! as Korean.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.stl`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::StringTableReader;
pub use types::StringTable;
pub use write::StringTableWriter;
