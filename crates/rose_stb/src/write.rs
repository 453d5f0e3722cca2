//! Types for writing data table files
//!

use binrw::BinWrite;
use rose_record::{LengthPrefix, RecordWriter, TextEncoding};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::{
    error::{Error, Result},
    types::{DataTable, Dimensions},
};

/// STB file generator
///
/// Rows shorter than the widest row are padded with empty cells, and missing column widths
/// and titles get defaults, so the written grid is always rectangular.
///
/// ```
/// # fn doit() -> rose_stb::error::Result<()> {
/// use rose_record::TextEncoding;
/// use rose_stb::{DataTable, DataTableWriter};
///
/// let mut table = DataTable::new(["", "NAME"]);
/// table.push_row(["1", "ITEM_001"]);
///
/// let data = DataTableWriter::new(TextEncoding::Korean).write(&table)?;
/// assert_eq!(DataTable::decode(&data)?.get(1, 1), Some("ITEM_001"));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct DataTableWriter {
    writer: RecordWriter,
}

impl DataTableWriter {
    /// Create a writer encoding strings with `encoding`.
    pub fn new(encoding: TextEncoding) -> DataTableWriter {
        DataTableWriter {
            writer: RecordWriter::new(encoding),
        }
    }

    /// Serialize `table` and return the file contents.
    #[instrument(skip_all, fields(rows = table.row_count()))]
    pub fn write(mut self, table: &DataTable) -> Result<Vec<u8>> {
        let rows = table.row_count().max(1);
        let columns = table.column_count().max(1);
        let dimensions = Dimensions {
            row_count: dimension(rows, rows, columns)?,
            column_count: dimension(columns, rows, columns)?,
            row_height: table.row_height(),
        };

        let padded = table
            .data_rows()
            .filter(|(_, cells)| cells.len() < columns)
            .count();
        if padded > 0 {
            debug!("padding {padded} rows to {columns} columns");
        }

        self.writer.write_bytes(b"STB1")?;
        let mut data_offset = self.writer.reserve_offsets(1)?;
        dimensions.write(self.writer.get_mut())?;

        for column in 0..=columns {
            self.writer
                .write_u16(table.column_widths().get(column).copied().unwrap_or_default())?;
        }

        for column in 0..columns {
            self.write_cell(table, 0, column)?;
        }
        self.writer
            .write_string(LengthPrefix::U16, table.id_column_title())?;
        for row in 1..rows {
            self.write_cell(table, row, 0)?;
        }

        self.writer.record_offset(&mut data_offset)?;
        for row in 1..rows {
            for column in 1..columns {
                self.write_cell(table, row, column)?;
            }
        }
        self.writer.patch(&data_offset)?;

        Ok(self.writer.into_inner())
    }

    fn write_cell(&mut self, table: &DataTable, row: usize, column: usize) -> Result<()> {
        Ok(self
            .writer
            .write_string(LengthPrefix::U16, table.get(row, column).unwrap_or_default())?)
    }
}

fn dimension(value: usize, rows: usize, columns: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidDimensions { rows, columns })
}

impl DataTable {
    /// Serialize the table with the encoding of the original client.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        DataTableWriter::new(TextEncoding::Korean).write(self)
    }

    /// Save the table to the path it was loaded from or last saved to.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(Error::NoPath)?;
        self.write_to(path)
    }

    /// Save the table to `path` and remember it for [`DataTable::save`].
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

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{error::Result, types::DataTable};

    #[test]
    fn write_ragged_rows() -> Result<()> {
        let mut table = DataTable::new(["ID"]);
        table.push_row(["1", "x"]);

        #[rustfmt::skip]
        let expected = vec![
            // Header
            b'S', b'T', b'B', b'1',
            0x25, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // Column widths
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Column titles
            0x02, 0x00, b'I', b'D',
            0x00, 0x00,
            // Id column title
            0x00, 0x00,
            // Row names
            0x01, 0x00, b'1',
            // Cells
            0x01, 0x00, b'x',
        ];

        assert_eq!(table.to_bytes()?, expected);

        Ok(())
    }

    #[test]
    fn write_empty_table() -> Result<()> {
        let decoded = DataTable::decode(&DataTable::default().to_bytes()?)?;

        assert_eq!(decoded.row_count(), 1);
        assert_eq!(decoded.header(), &[""]);
        assert_eq!(decoded.data_rows().count(), 0);

        Ok(())
    }
}
