//! Types for reading string table files
//!

use rose_record::{LengthPrefix, LoadOptions, RecordReader, Recovered, TextEncoding};
use std::{
    io::{Cursor, Read, Seek},
    path::Path,
};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{Error, Result},
    types::{Entry, Row, RowGrid, RowShape, StringTable},
};

/// Largest language count accepted from a file
pub const MAX_LANGUAGE_COUNT: i32 = 10;

/// Language count used when the file declares an implausible one
pub const DEFAULT_LANGUAGE_COUNT: usize = 2;

/// Smallest possible entry record: an empty string id and the numeric id
const MIN_ENTRY_SIZE: u64 = 5;

/// STL file reader
///
/// Parses a whole file under a single encoding. Use [`StringTable::load`] or
/// [`StringTable::decode`] to try every candidate encoding.
///
/// ```no_run
/// use std::fs::File;
/// use rose_record::TextEncoding;
/// use rose_stl::StringTableReader;
///
/// fn list_entries(file: File) -> rose_stl::error::Result<()> {
///     let stl = StringTableReader::new(file, TextEncoding::Korean)?.read()?;
///
///     for (i, entry) in stl.entries().iter().enumerate() {
///         println!("{}: {}", entry.string_id, stl.text(0, i).unwrap_or_default());
///     }
///
///     Ok(())
/// }
/// ```
pub struct StringTableReader<R> {
    reader: RecordReader<R>,
    drop_undecodable_rows: bool,
}

impl<R: Read + Seek> StringTableReader<R> {
    /// Prepare to read a STL file, decoding strings with `encoding`.
    pub fn new(reader: R, encoding: TextEncoding) -> Result<StringTableReader<R>> {
        Ok(StringTableReader {
            reader: RecordReader::new(reader, encoding)?,
            drop_undecodable_rows: false,
        })
    }

    /// Replace rows that are not valid in the reader's encoding with empty rows instead
    /// of failing the parse.
    ///
    /// The type tag and entry ids are still decoded strictly.
    pub fn drop_undecodable_rows(mut self) -> StringTableReader<R> {
        self.drop_undecodable_rows = true;
        self
    }

    /// Parse the whole file.
    ///
    /// Damaged offsets and rows are replaced with empty values and logged. Text that is
    /// not valid in the reader's encoding fails the whole parse, unless
    /// [`StringTableReader::drop_undecodable_rows`] was set.
    #[instrument(skip(self), fields(encoding = %self.reader.encoding()))]
    pub fn read(mut self) -> Result<StringTable> {
        let type_tag = self.reader.read_string(LengthPrefix::VarInt)?;
        let shape = RowShape::from_type_tag(&type_tag);
        debug!(%type_tag, %shape, "reading string table");

        let entries = self.read_entries()?;

        let language_count =
            language_count(self.reader.read_i32()?).logged("language count");

        let language_offsets = (0..language_count)
            .map(|language| {
                Ok(Recovered::recover(self.reader.read_i32(), 0)?
                    .logged(format_args!("offset of language {language}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let entry_offsets = language_offsets
            .iter()
            .enumerate()
            .map(|(language, offset)| self.read_entry_offsets(language, *offset, entries.len()))
            .collect::<Result<Vec<_>>>()?;

        let rows = match shape {
            RowShape::Plain => RowGrid::Plain(self.read_rows(&entry_offsets, entries.len())?),
            RowShape::Commented => {
                RowGrid::Commented(self.read_rows(&entry_offsets, entries.len())?)
            }
            RowShape::Quest => RowGrid::Quest(self.read_rows(&entry_offsets, entries.len())?),
        };

        Ok(StringTable {
            type_tag,
            entries,
            rows,
            encoding: self.reader.encoding(),
            path: None,
        })
    }

    fn read_entries(&mut self) -> Result<Vec<Entry>> {
        let count = self.reader.read_i32()?;
        if count < 0 {
            return Err(Error::InvalidEntryCount(count));
        }
        self.reader.ensure_remaining(count as u64 * MIN_ENTRY_SIZE)?;

        (0..count)
            .map(|_| {
                Ok(Entry {
                    string_id: self.reader.read_string(LengthPrefix::VarInt)?,
                    numeric_id: self.reader.read_i32()?,
                })
            })
            .collect()
    }

    fn read_entry_offsets(
        &mut self,
        language: usize,
        offset: i32,
        entry_count: usize,
    ) -> Result<Option<Vec<i32>>> {
        if entry_count == 0 {
            return Ok(Some(Vec::new()));
        }

        // Offset 0 holds the type tag, so no table can start there
        if offset == 0 {
            warn!("language {language} has no entry table");
            return Ok(None);
        }

        if let Err(e) = self.reader.seek_absolute(offset as i64) {
            warn!("skipping language {language}: {e}");
            return Ok(None);
        }

        (0..entry_count)
            .map(|entry| {
                Ok(Recovered::recover(self.reader.read_i32(), 0)?
                    .logged(format_args!("offset of entry {entry} in language {language}")))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn read_rows<T: Row>(
        &mut self,
        entry_offsets: &[Option<Vec<i32>>],
        entry_count: usize,
    ) -> Result<Vec<Vec<T>>> {
        entry_offsets
            .iter()
            .enumerate()
            .map(|(language, offsets)| match offsets {
                Some(offsets) => offsets
                    .iter()
                    .enumerate()
                    .map(|(entry, offset)| self.read_row(language, entry, *offset))
                    .collect::<Result<Vec<T>>>(),
                None => Ok(vec![T::default(); entry_count]),
            })
            .collect()
    }

    fn read_row<T: Row>(&mut self, language: usize, entry: usize, offset: i32) -> Result<T> {
        if offset == 0 {
            warn!("entry {entry} in language {language} has no row");
            return Ok(T::default());
        }

        let row = self
            .reader
            .seek_absolute(offset as i64)
            .and_then(|_| T::read(&mut self.reader));

        let row = match row {
            Err(reason @ rose_record::error::Error::DecodeFailure { .. })
                if self.drop_undecodable_rows =>
            {
                Recovered::Fallback {
                    value: T::default(),
                    reason,
                }
            }
            row => Recovered::recover(row, T::default())?,
        };

        Ok(row.logged(format_args!("row of entry {entry} in language {language}")))
    }
}

fn language_count(declared: i32) -> Recovered<usize, Error> {
    if declared <= 0 || declared > MAX_LANGUAGE_COUNT {
        Recovered::Fallback {
            value: DEFAULT_LANGUAGE_COUNT,
            reason: Error::InvalidLanguageCount(declared),
        }
    } else {
        Recovered::Value(declared as usize)
    }
}

impl StringTable {
    /// Parse a STL file held in memory, trying each encoding of `options` in turn.
    ///
    /// If no encoding parses every row, the first encoding is used once more with
    /// undecodable rows left empty. Never fails: if that too can't parse the data an empty
    /// table is returned.
    pub fn decode_with(data: &[u8], options: &LoadOptions) -> StringTable {
        for encoding in &options.encodings {
            let parsed =
                StringTableReader::new(Cursor::new(data), *encoding).and_then(|r| r.read());
            match parsed {
                Ok(table) => return table,
                Err(e) => warn!("unable to parse string table as {encoding}: {e}"),
            }
        }

        if let Some(encoding) = options.encodings.first() {
            let parsed = StringTableReader::new(Cursor::new(data), *encoding)
                .and_then(|r| r.drop_undecodable_rows().read());
            match parsed {
                Ok(table) => {
                    warn!("parsed string table as {encoding} without its undecodable rows");
                    return table;
                }
                Err(e) => warn!("unable to parse string table as {encoding}: {e}"),
            }
        }

        error!("unable to parse string table with any encoding");
        StringTable::default()
    }

    /// Parse a STL file held in memory with the default encoding candidates.
    pub fn decode(data: &[u8]) -> StringTable {
        StringTable::decode_with(data, &LoadOptions::default())
    }

    /// Load a STL file, trying each encoding of `options` in turn.
    ///
    /// Never fails: an unreadable or unparsable file yields an empty table. The path is
    /// remembered either way so the table can be saved back.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> StringTable {
        let path = path.as_ref();

        let mut table = match std::fs::read(path) {
            Ok(data) => StringTable::decode_with(&data, options),
            Err(e) => {
                error!("unable to read {}: {e}", path.display());
                StringTable::default()
            }
        };
        table.set_path(path);

        debug!(
            entries = table.len(),
            languages = table.language_count(),
            encoding = %table.encoding(),
            "loaded string table"
        );
        table
    }

    /// Load a STL file with the default encoding candidates.
    pub fn load(path: impl AsRef<Path>) -> StringTable {
        StringTable::load_with(path, &LoadOptions::default())
    }
}

#[cfg(test)]
mod test {
    use rose_record::TextEncoding;
    use std::io::Cursor;
    use tracing_test::traced_test;

    use crate::{
        error::Result,
        read::StringTableReader,
        types::{RowGrid, StringTable},
    };

    fn header(language_count: i32) -> Vec<u8> {
        #[rustfmt::skip]
        let mut input = vec![
            // Type
            0x06, b'N', b'R', b'S', b'T', b'0', b'1',
            // Entries
            0x01, 0x00, 0x00, 0x00,
            0x04, b'I', b'D', b'_', b'A', 0x07, 0x00, 0x00, 0x00,
        ];
        input.extend_from_slice(&language_count.to_le_bytes());
        input
    }

    #[test]
    fn read_single_entry() -> Result<()> {
        let mut input = header(2);
        #[rustfmt::skip]
        let body = [
            // Language offsets
            0x20, 0x00, 0x00, 0x00,
            0x24, 0x00, 0x00, 0x00,
            // Entry offsets
            0x28, 0x00, 0x00, 0x00,
            0x2B, 0x00, 0x00, 0x00,
            // Rows
            0x02, 0xB0, 0xCB,
            0x05, b'S', b'w', b'o', b'r', b'd',
        ];
        input.extend_from_slice(&body);

        let table = StringTableReader::new(Cursor::new(input), TextEncoding::Korean)?.read()?;

        assert_eq!(table.type_tag(), "NRST01");
        assert_eq!(table.entries()[0].string_id, "ID_A");
        assert_eq!(table.entries()[0].numeric_id, 7);
        assert_eq!(table.text(0, 0), Some("검"));
        assert_eq!(table.text(1, 0), Some("Sword"));
        assert_eq!(table.search("id_a"), "Sword");

        Ok(())
    }

    #[traced_test]
    #[test]
    fn truncated_entry_table() {
        let mut input = header(2);
        #[rustfmt::skip]
        let body = [
            // Language offsets, the second leaves two bytes for its table
            0x20, 0x00, 0x00, 0x00,
            0x28, 0x00, 0x00, 0x00,
            // Entry offsets
            0x24, 0x00, 0x00, 0x00,
            // Rows
            0x05, b'S', b'w', b'o', b'r', b'd',
        ];
        input.extend_from_slice(&body);

        let table = StringTable::decode(&input);

        assert_eq!(table.language_count(), 2);
        assert_eq!(table.text(0, 0), Some("Sword"));
        assert_eq!(table.text(1, 0), Some(""));
        assert!(logs_contain("using fallback for offset of entry 0 in language 1"));
        assert!(logs_contain("entry 0 in language 1 has no row"));
    }

    fn decode_with_row_offset(row_offset: i32) -> StringTable {
        let mut input = header(2);
        #[rustfmt::skip]
        let body = [
            // Language offsets
            0x20, 0x00, 0x00, 0x00,
            0x24, 0x00, 0x00, 0x00,
            // Entry offsets
            0x28, 0x00, 0x00, 0x00,
        ];
        input.extend_from_slice(&body);
        input.extend_from_slice(&row_offset.to_le_bytes());
        input.extend_from_slice(&[0x05, b'S', b'w', b'o', b'r', b'd']);

        let table = StringTable::decode(&input);
        assert_eq!(table.len(), 1);
        assert_eq!(table.text(0, 0), Some("Sword"));
        assert_eq!(table.text(1, 0), Some(""));
        table
    }

    #[traced_test]
    #[test]
    fn row_offset_past_end_of_file() {
        decode_with_row_offset(0x0FFF_FFFF);
        assert!(logs_contain("using fallback for row of entry 0 in language 1"));
    }

    #[traced_test]
    #[test]
    fn zero_row_offset() {
        decode_with_row_offset(0);
        assert!(logs_contain("entry 0 in language 1 has no row"));
    }

    #[traced_test]
    #[test]
    fn missing_entry_table_fills_language() {
        let mut input = header(2);
        #[rustfmt::skip]
        let body = [
            // Language offsets, the second is absent
            0x20, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // Entry offsets
            0x24, 0x00, 0x00, 0x00,
            // Rows
            0x05, b'S', b'w', b'o', b'r', b'd',
        ];
        input.extend_from_slice(&body);

        let table = StringTable::decode(&input);

        assert_eq!(table.text(0, 0), Some("Sword"));
        assert_eq!(table.text(1, 0), Some(""));
        assert!(logs_contain("language 1 has no entry table"));
        assert!(!logs_contain("has no row"));
    }

    fn decode_with_language_count(language_count: i32) -> StringTable {
        let mut input = header(language_count);
        input.extend_from_slice(&[0xFF; 3]);

        let table = StringTable::decode(&input);
        assert_eq!(table.language_count(), 2);
        assert_eq!(table.len(), 1);
        assert!(matches!(table.rows(), RowGrid::Plain(rows) if rows.iter().all(|r| r.len() == 1)));
        table
    }

    #[traced_test]
    #[test]
    fn clamp_zero_language_count() {
        decode_with_language_count(0);
        assert!(logs_contain("invalid language count 0"));
    }

    #[traced_test]
    #[test]
    fn clamp_negative_language_count() {
        decode_with_language_count(-5);
        assert!(logs_contain("invalid language count -5"));
    }

    #[traced_test]
    #[test]
    fn clamp_huge_language_count() {
        let table = decode_with_language_count(500);
        assert_eq!(table.text(1, 0), Some(""));
        assert!(logs_contain("invalid language count 500"));
    }

    #[traced_test]
    #[test]
    fn negative_entry_count_yields_empty_table() {
        #[rustfmt::skip]
        let input = vec![
            0x06, b'N', b'R', b'S', b'T', b'0', b'1',
            0xFF, 0xFF, 0xFF, 0xFF,
        ];

        let table = StringTable::decode(&input);
        assert_eq!(table, StringTable::default());
        assert!(logs_contain("invalid entry count -1"));
        assert!(logs_contain("unable to parse string table with any encoding"));
    }

    #[traced_test]
    #[test]
    fn entry_count_larger_than_file() {
        #[rustfmt::skip]
        let input = vec![
            0x06, b'N', b'R', b'S', b'T', b'0', b'1',
            0xFF, 0xFF, 0xFF, 0x7F,
        ];

        let table = StringTable::decode(&input);
        assert!(table.is_empty());
        assert_eq!(table.language_count(), 0);
    }

    #[traced_test]
    #[test]
    fn empty_file_yields_empty_table() {
        let table = StringTable::decode(&[]);
        assert_eq!(table, StringTable::default());
    }
}
