//! Types for reading data table files
//!

use binrw::BinRead;
use rose_record::{LengthPrefix, LoadOptions, RecordReader, TextEncoding};
use std::{
    io::{Cursor, Read, Seek},
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::{
    error::{Error, Result},
    types::{DataTable, StbHeader},
};

/// Smallest possible string: an empty one with its `u16` length
const MIN_STRING_SIZE: u64 = 2;

/// STB file reader
///
/// Parses a whole file under a single encoding. Use [`DataTable::load`] or
/// [`DataTable::decode`] to try every candidate encoding.
///
/// ```no_run
/// use std::fs::File;
/// use rose_record::TextEncoding;
/// use rose_stb::DataTableReader;
///
/// fn list_rows(file: File) -> rose_stb::error::Result<()> {
///     let stb = DataTableReader::new(file, TextEncoding::Korean)?.read()?;
///
///     for (index, cells) in stb.data_rows() {
///         println!("{index}: {}", cells.join(", "));
///     }
///
///     Ok(())
/// }
/// ```
pub struct DataTableReader<R> {
    reader: RecordReader<R>,
}

impl<R: Read + Seek> DataTableReader<R> {
    /// Prepare to read a STB file, decoding strings with `encoding`.
    pub fn new(reader: R, encoding: TextEncoding) -> Result<DataTableReader<R>> {
        Ok(DataTableReader {
            reader: RecordReader::new(reader, encoding)?,
        })
    }

    /// Parse the whole file.
    ///
    /// Unlike string tables, data tables are read strictly: any damage fails the parse.
    #[instrument(skip(self), fields(encoding = %self.reader.encoding()))]
    pub fn read(mut self) -> Result<DataTable> {
        let header = StbHeader::read(self.reader.get_mut()).map_err(|e| match e {
            binrw::Error::BadMagic { .. } => Error::InvalidMagic,
            e => Error::BinRWError(e),
        })?;

        let rows = header.dimensions.row_count as usize;
        let columns = header.dimensions.column_count as usize;
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidDimensions { rows, columns });
        }
        debug!(rows, columns, data_offset = header.data_offset, "reading data table");

        let column_widths = (0..=columns)
            .map(|_| self.reader.read_u16())
            .collect::<rose_record::error::Result<Vec<_>>>()?;

        let column_titles = self.read_strings(columns)?;
        let id_column_title = self.reader.read_string(LengthPrefix::U16)?;
        let row_names = self.read_strings(rows - 1)?;

        let cell_count = (rows - 1) * (columns - 1);
        if cell_count > 0 {
            self.reader.seek_absolute(header.data_offset as i64)?;
        }

        let mut table_rows = Vec::with_capacity(rows);
        table_rows.push(column_titles);
        for name in row_names {
            let mut cells = Vec::with_capacity(columns);
            cells.push(name);
            cells.extend(self.read_strings(columns - 1)?);
            table_rows.push(cells);
        }

        Ok(DataTable {
            row_height: header.dimensions.row_height,
            column_widths,
            id_column_title,
            rows: table_rows,
            encoding: self.reader.encoding(),
            path: None,
        })
    }

    fn read_strings(&mut self, count: usize) -> Result<Vec<String>> {
        self.reader
            .ensure_remaining(count as u64 * MIN_STRING_SIZE)?;

        Ok((0..count)
            .map(|_| self.reader.read_string(LengthPrefix::U16))
            .collect::<rose_record::error::Result<Vec<_>>>()?)
    }
}

impl DataTable {
    /// Parse a STB file held in memory, trying each encoding of `options` in turn.
    ///
    /// Only text that fails to decode moves on to the next encoding. Structural damage
    /// fails immediately since no other encoding could fix it.
    pub fn decode_with(data: &[u8], options: &LoadOptions) -> Result<DataTable> {
        let mut last_error = None;
        for encoding in &options.encodings {
            match DataTableReader::new(Cursor::new(data), *encoding)?.read() {
                Ok(table) => return Ok(table),
                Err(Error::RecordError(e @ rose_record::error::Error::DecodeFailure { .. })) => {
                    warn!("unable to parse data table as {encoding}: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::RecordError(last_error.unwrap_or(
            rose_record::error::Error::DecodeFailure {
                encoding: TextEncoding::default(),
            },
        )))
    }

    /// Parse a STB file held in memory with the default encoding candidates.
    pub fn decode(data: &[u8]) -> Result<DataTable> {
        DataTable::decode_with(data, &LoadOptions::default())
    }

    /// Load a STB file, trying each encoding of `options` in turn.
    #[instrument(skip_all, err, fields(path = %path.as_ref().display()))]
    pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DataTable> {
        let path = path.as_ref();

        let mut table = DataTable::decode_with(&std::fs::read(path)?, options)?;
        table.set_path(path);

        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            encoding = %table.encoding(),
            "loaded data table"
        );
        Ok(table)
    }

    /// Load a STB file with the default encoding candidates.
    pub fn load(path: impl AsRef<Path>) -> Result<DataTable> {
        DataTable::load_with(path, &LoadOptions::default())
    }
}
