//! Types for writing string table files
//!

use rose_record::{LengthPrefix, RecordWriter, TextEncoding};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    error::{Error, Result},
    read::MAX_LANGUAGE_COUNT,
    types::{with_rows, Row, RowGrid, StringTable},
};

/// STL file generator
///
/// Every offset is derived again from the data being written; offsets read from the
/// original file are never reused.
///
/// ```
/// # fn doit() -> rose_stl::error::Result<()> {
/// use rose_record::TextEncoding;
/// use rose_stl::{types::Entry, StringTable, StringTableWriter};
///
/// let mut table = StringTable::new("NRST01", 2);
/// let entry = table.push_entry(Entry::new("ITEM_001".into(), 1));
/// table.set_text(1, entry, "Sword");
///
/// let data = StringTableWriter::new(TextEncoding::Korean).write(&table)?;
/// assert_eq!(StringTable::decode(&data).search("ITEM_001"), "Sword");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct StringTableWriter {
    writer: RecordWriter,
}

impl StringTableWriter {
    /// Create a writer encoding strings with `encoding`.
    pub fn new(encoding: TextEncoding) -> StringTableWriter {
        StringTableWriter {
            writer: RecordWriter::new(encoding),
        }
    }

    /// Serialize `table` and return the file contents.
    #[instrument(skip_all, fields(type_tag = %table.type_tag(), entries = table.len()))]
    pub fn write(mut self, table: &StringTable) -> Result<Vec<u8>> {
        self.writer
            .write_string(LengthPrefix::VarInt, table.type_tag())?;

        self.writer.write_i32(count(table.len())?)?;
        for entry in table.entries() {
            self.writer
                .write_string(LengthPrefix::VarInt, &entry.string_id)?;
            self.writer.write_i32(entry.numeric_id)?;
        }

        with_rows!(table.rows(), rows => self.write_languages(rows, table.len())?);

        Ok(self.writer.into_inner())
    }

    fn write_languages<T: Row>(&mut self, languages: &[Vec<T>], entry_count: usize) -> Result<()> {
        let language_count = count(languages.len())?;
        if language_count > MAX_LANGUAGE_COUNT {
            return Err(Error::InvalidLanguageCount(language_count));
        }
        self.writer.write_i32(language_count)?;

        let mut language_table = self.writer.reserve_offsets(languages.len())?;
        let mut entry_tables = Vec::with_capacity(languages.len());
        for _ in languages {
            self.writer.record_offset(&mut language_table)?;
            entry_tables.push(self.writer.reserve_offsets(entry_count)?);
        }

        for (language, (rows, entry_table)) in languages.iter().zip(&mut entry_tables).enumerate() {
            if rows.len() != entry_count {
                warn!(
                    "language {language} has {} rows for {entry_count} entries, {} to fit",
                    rows.len(),
                    if rows.len() < entry_count { "padding" } else { "truncating" }
                );
            }

            let padding = T::default();
            for entry in 0..entry_count {
                self.writer.record_offset(entry_table)?;
                rows.get(entry).unwrap_or(&padding).write(&mut self.writer)?;
            }

            self.writer.patch(entry_table)?;
        }

        self.writer.patch(&language_table)?;

        Ok(())
    }
}

fn count(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        Error::RecordError(rose_record::error::Error::FileTooLarge { len: len as u64 })
    })
}

impl StringTable {
    /// Serialize the table with the encoding of the original client.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        StringTableWriter::new(TextEncoding::Korean).write(self)
    }

    /// Save the table to the path it was loaded from or last saved to.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(Error::NoPath)?;
        self.write_to(path)
    }

    /// Save the table to `path` and remember it for [`StringTable::save`].
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    #[instrument(skip(self), err)]
    fn write_to(&self, path: &Path) -> Result<()> {
        let data = self.to_bytes()?;
        std::fs::write(path, &data)?;
        info!("wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}
