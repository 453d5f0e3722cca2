//! # STB Format Documentation
//!
//! This crate provides utilities to read, edit and write the **STB** data tables used by the
//! game *ROSE Online*. A STB file is a grid of strings: items, NPCs, drop lists and most other
//! game data are stored this way. STB files are typically identified with the `.stb` extension.
//!
//! ## File Structure
//!
//! Strings are prefixed with their encoded byte length as a `u16`.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `STB1`                                            |
//! | 0x0004         | Data Offset            | 4 bytes: absolute offset of the cell block                 |
//! | 0x0008         | Row Count              | 4 bytes: number of rows `R`, including the header row      |
//! | 0x000C         | Column Count           | 4 bytes: number of columns `C`, including the name column  |
//! | 0x0010         | Row Height             | 4 bytes: display height of a row in the editor             |
//! | 0x0014         | Column Widths          | (`C` + 1) × 2 bytes: display width of each column          |
//! | ...            | Column Titles          | `C` strings                                                |
//! | ...            | Id Column Title        | string                                                     |
//! | ...            | Row Names              | (`R` - 1) strings                                          |
//! | data offset    | Cells                  | (`R` - 1) × (`C` - 1) strings, row by row                  |
//!
//! ## Grid
//!
//! A loaded [`DataTable`] exposes the file as rows of cells: row 0 holds the column titles and
//! every other row starts with its row name, so `get(row, column)` addresses the file the way
//! the game's own tools do.
//!
//! Text is decoded strictly, trying Korean, Japanese and Chinese in turn (see
//! [`rose_record::LoadOptions`]). Files are always written as Korean.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.stb`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::DataTableReader;
pub use types::DataTable;
pub use write::DataTableWriter;
