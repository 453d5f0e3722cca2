//! Base types for structure of STB files.

use binrw::{BinRead, BinWrite};
use rose_record::TextEncoding;
use std::path::{Path, PathBuf};

/// STB file header
///
/// Always starts with "STB1". All data is stored in little endian format.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(magic = b"STB1", little)]
pub struct StbHeader {
    /// The offset from the beginning of the file where the cell block starts
    pub data_offset: u32,

    /// Size of the grid
    pub dimensions: Dimensions,
}

/// Grid size stored after the data offset
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct Dimensions {
    /// Number of rows, including the header row
    pub row_count: u32,

    /// Number of columns, including the row-name column
    pub column_count: u32,

    /// Display height of a row in the editor
    pub row_height: u32,
}

/// A generic data table
///
/// Row 0 holds the column titles. Every other row starts with its row name, followed by
/// its cells. Rows may have different lengths while the table is edited; they are padded
/// to the widest row when the table is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub(crate) row_height: u32,
    pub(crate) column_widths: Vec<u16>,
    pub(crate) id_column_title: String,
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) encoding: TextEncoding,
    pub(crate) path: Option<PathBuf>,
}

impl Default for DataTable {
    fn default() -> Self {
        DataTable::new(Vec::<String>::new())
    }
}

impl DataTable {
    /// Create a table holding only a header row with the given column titles
    pub fn new<S: Into<String>>(column_titles: impl IntoIterator<Item = S>) -> DataTable {
        DataTable {
            row_height: 0,
            column_widths: Vec::new(),
            id_column_title: String::new(),
            rows: vec![column_titles.into_iter().map(Into::into).collect()],
            encoding: TextEncoding::default(),
            path: None,
        }
    }

    /// Encoding the table was decoded with
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Path the table was loaded from or last saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the path [`DataTable::save`] writes to
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Display height of a row in the editor
    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Editor widths of the columns
    pub fn column_widths(&self) -> &[u16] {
        &self.column_widths
    }

    /// Title of the id column
    pub fn id_column_title(&self) -> &str {
        &self.id_column_title
    }

    /// Every row, the header row included
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Mutable access to every row, the header row included
    pub fn rows_mut(&mut self) -> &mut Vec<Vec<String>> {
        &mut self.rows
    }

    /// Number of rows, the header row included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or_default()
    }

    /// Column titles
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Cell at `row` and `column`
    ///
    /// Column 0 is the row name. Returns `None` outside of the row.
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Replace a cell, returning whether the row exists
    ///
    /// A row shorter than `column` is extended with empty cells.
    pub fn set(&mut self, row: usize, column: usize, value: impl Into<String>) -> bool {
        let Some(cells) = self.rows.get_mut(row) else {
            return false;
        };

        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.into();
        true
    }

    /// Append a row and return its index
    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) -> usize {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self.rows.len() - 1
    }

    /// Remove a data row and return its cells
    ///
    /// The header row can't be removed. Rows after `index` move up by one.
    pub fn remove_row(&mut self, index: usize) -> Option<Vec<String>> {
        if index == 0 || index >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(index))
    }

    /// Every row after the header, with its index
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, cells)| (index, cells.as_slice()))
    }

    /// Index of the first data row with the given row name
    pub fn find_row(&self, name: &str) -> Option<usize> {
        self.data_rows()
            .find(|(_, cells)| cells.first().is_some_and(|cell| cell == name))
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::types::DataTable;

    fn table() -> DataTable {
        let mut table = DataTable::new(["", "NAME", "PRICE"]);
        table.push_row(["1", "ITEM_001", "100"]);
        table.push_row(["2", "ITEM_002"]);
        table
    }

    #[test]
    fn get_cells() {
        let table = table();
        assert_eq!(table.get(0, 1), Some("NAME"));
        assert_eq!(table.get(1, 2), Some("100"));
        assert_eq!(table.get(2, 2), None);
        assert_eq!(table.get(3, 0), None);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn set_grows_row() {
        let mut table = table();
        assert!(table.set(2, 4, "x"));
        assert_eq!(table.rows()[2], vec!["2", "ITEM_002", "", "", "x"]);
        assert_eq!(table.column_count(), 5);

        assert!(!table.set(9, 0, "missing"));
    }

    #[test]
    fn remove_rows() {
        let mut table = table();
        assert_eq!(table.remove_row(0), None);
        assert_eq!(table.remove_row(5), None);
        assert_eq!(
            table.remove_row(1),
            Some(vec!["1".into(), "ITEM_001".into(), "100".into()])
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 1), Some("ITEM_002"));
    }

    #[test]
    fn data_rows_skip_header() {
        let table = table();
        let indices = table.data_rows().map(|(i, _)| i).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(table.find_row("2"), Some(2));
        assert_eq!(table.find_row(""), None);
    }
}
