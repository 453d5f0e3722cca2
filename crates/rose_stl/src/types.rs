//! Base types for structure of STL files.

use derive_more::derive::{Constructor, Display};
use rose_record::{LengthPrefix, RecordReader, RecordWriter, TextEncoding};
use std::{
    fmt::Debug,
    io::{Read, Seek},
    path::{Path, PathBuf},
};

/// Type tag of quest string tables
pub const QUEST_TYPE: &str = "QEST01";

/// Type tag of item string tables
pub const ITEM_TYPE: &str = "ITST01";

/// Type tag of plain string tables
pub const NORMAL_TYPE: &str = "NRST01";

/// Language whose text [`StringTable::search`] returns
pub const DISPLAY_LANGUAGE: usize = 1;

/// One record of the entry directory
#[derive(Constructor, Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Stable textual key other tables refer to
    pub string_id: String,

    /// Format specific tag, not interpreted by the codec
    pub numeric_id: i32,
}

/// Fields carried by every row of a table, chosen once by its type tag
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum RowShape {
    /// Text only
    #[display("plain")]
    Plain,

    /// Text and comment ([`ITEM_TYPE`])
    #[display("commented")]
    Commented,

    /// Text, comment and two quest strings ([`QUEST_TYPE`])
    #[display("quest")]
    Quest,
}

impl RowShape {
    /// Row shape a type tag stands for
    pub fn from_type_tag(type_tag: &str) -> RowShape {
        match type_tag {
            QUEST_TYPE => RowShape::Quest,
            ITEM_TYPE => RowShape::Commented,
            _ => RowShape::Plain,
        }
    }
}

/// A row payload as it is stored in the file
pub trait Row: Debug + Default + Clone + PartialEq {
    /// Shape this row type implements
    const SHAPE: RowShape;

    /// The localized text
    fn text(&self) -> &str;

    /// Replace the localized text
    fn set_text(&mut self, text: String);

    /// Read the row at the current position
    fn read<R: Read + Seek>(reader: &mut RecordReader<R>) -> rose_record::error::Result<Self>;

    /// Write the row at the current position
    fn write(&self, writer: &mut RecordWriter) -> rose_record::error::Result<()>;
}

/// Row of a [`RowShape::Plain`] table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainRow {
    pub text: String,
}

/// Row of a [`RowShape::Commented`] table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentedRow {
    pub text: String,
    pub comment: String,
}

/// Row of a [`RowShape::Quest`] table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestRow {
    pub text: String,
    pub comment: String,
    pub quest1: String,
    pub quest2: String,
}

impl Row for PlainRow {
    const SHAPE: RowShape = RowShape::Plain;

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn read<R: Read + Seek>(reader: &mut RecordReader<R>) -> rose_record::error::Result<Self> {
        Ok(PlainRow {
            text: reader.read_string(LengthPrefix::VarInt)?,
        })
    }

    fn write(&self, writer: &mut RecordWriter) -> rose_record::error::Result<()> {
        writer.write_string(LengthPrefix::VarInt, &self.text)
    }
}

impl Row for CommentedRow {
    const SHAPE: RowShape = RowShape::Commented;

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn read<R: Read + Seek>(reader: &mut RecordReader<R>) -> rose_record::error::Result<Self> {
        Ok(CommentedRow {
            text: reader.read_string(LengthPrefix::VarInt)?,
            comment: reader.read_string(LengthPrefix::VarInt)?,
        })
    }

    fn write(&self, writer: &mut RecordWriter) -> rose_record::error::Result<()> {
        writer.write_string(LengthPrefix::VarInt, &self.text)?;
        writer.write_string(LengthPrefix::VarInt, &self.comment)
    }
}

impl Row for QuestRow {
    const SHAPE: RowShape = RowShape::Quest;

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn read<R: Read + Seek>(reader: &mut RecordReader<R>) -> rose_record::error::Result<Self> {
        Ok(QuestRow {
            text: reader.read_string(LengthPrefix::VarInt)?,
            comment: reader.read_string(LengthPrefix::VarInt)?,
            quest1: reader.read_string(LengthPrefix::VarInt)?,
            quest2: reader.read_string(LengthPrefix::VarInt)?,
        })
    }

    fn write(&self, writer: &mut RecordWriter) -> rose_record::error::Result<()> {
        writer.write_string(LengthPrefix::VarInt, &self.text)?;
        writer.write_string(LengthPrefix::VarInt, &self.comment)?;
        writer.write_string(LengthPrefix::VarInt, &self.quest1)?;
        writer.write_string(LengthPrefix::VarInt, &self.quest2)
    }
}

/// Rows of a table indexed by language, then by entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowGrid {
    Plain(Vec<Vec<PlainRow>>),
    Commented(Vec<Vec<CommentedRow>>),
    Quest(Vec<Vec<QuestRow>>),
}

/// Run `$body` with `$rows` bound to the typed grid, whatever its shape
macro_rules! with_rows {
    ($grid:expr, $rows:ident => $body:expr) => {
        match $grid {
            RowGrid::Plain($rows) => $body,
            RowGrid::Commented($rows) => $body,
            RowGrid::Quest($rows) => $body,
        }
    };
}

pub(crate) use with_rows;

impl RowGrid {
    /// A grid of `languages` empty languages
    pub fn new(shape: RowShape, languages: usize) -> RowGrid {
        match shape {
            RowShape::Plain => RowGrid::Plain(vec![Vec::new(); languages]),
            RowShape::Commented => RowGrid::Commented(vec![Vec::new(); languages]),
            RowShape::Quest => RowGrid::Quest(vec![Vec::new(); languages]),
        }
    }

    /// Shape of every row in the grid
    pub fn shape(&self) -> RowShape {
        match self {
            RowGrid::Plain(_) => RowShape::Plain,
            RowGrid::Commented(_) => RowShape::Commented,
            RowGrid::Quest(_) => RowShape::Quest,
        }
    }

    /// Number of languages
    pub fn language_count(&self) -> usize {
        with_rows!(self, rows => rows.len())
    }

    /// Text of one row
    pub fn text(&self, language: usize, entry: usize) -> Option<&str> {
        with_rows!(self, rows => rows
            .get(language)
            .and_then(|language| language.get(entry))
            .map(|row| row.text()))
    }

    /// Replace the text of one row, returning whether the row exists
    pub fn set_text(&mut self, language: usize, entry: usize, text: impl Into<String>) -> bool {
        with_rows!(self, rows => match rows
            .get_mut(language)
            .and_then(|language| language.get_mut(entry))
        {
            Some(row) => {
                row.set_text(text.into());
                true
            }
            None => false,
        })
    }

    fn push_default(&mut self) {
        with_rows!(self, rows => rows
            .iter_mut()
            .for_each(|language| language.push(Default::default())))
    }
}

/// A localized string table
///
/// Holds the entry directory and one row per entry for every language. The shape of the
/// rows is fixed by the type tag when the table is created or loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTable {
    pub(crate) type_tag: String,
    pub(crate) entries: Vec<Entry>,
    pub(crate) rows: RowGrid,
    pub(crate) encoding: TextEncoding,
    pub(crate) path: Option<PathBuf>,
}

impl Default for StringTable {
    fn default() -> Self {
        StringTable::new("", 0)
    }
}

impl StringTable {
    /// Create an empty table with `languages` languages
    pub fn new(type_tag: impl Into<String>, languages: usize) -> StringTable {
        let type_tag = type_tag.into();
        let rows = RowGrid::new(RowShape::from_type_tag(&type_tag), languages);

        StringTable {
            type_tag,
            entries: Vec::new(),
            rows,
            encoding: TextEncoding::default(),
            path: None,
        }
    }

    /// Format discriminator controlling the row shape
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Shape of the rows
    pub fn shape(&self) -> RowShape {
        self.rows.shape()
    }

    /// Encoding the table was decoded with
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Path the table was loaded from or last saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the path [`StringTable::save`] writes to
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// The entry directory
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of languages
    pub fn language_count(&self) -> usize {
        self.rows.language_count()
    }

    /// The rows of every language
    pub fn rows(&self) -> &RowGrid {
        &self.rows
    }

    /// Mutable access to the rows of every language
    ///
    /// Rows may be edited in place. Row lists that no longer match the entry directory are
    /// padded or truncated when the table is written.
    pub fn rows_mut(&mut self) -> &mut RowGrid {
        &mut self.rows
    }

    /// Text of an entry in a language
    pub fn text(&self, language: usize, entry: usize) -> Option<&str> {
        self.rows.text(language, entry)
    }

    /// Replace the text of an entry in a language, returning whether the row exists
    pub fn set_text(&mut self, language: usize, entry: usize, text: impl Into<String>) -> bool {
        self.rows.set_text(language, entry, text)
    }

    /// Append an entry with an empty row in every language, returning its ordinal
    pub fn push_entry(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.rows.push_default();
        self.entries.len() - 1
    }

    /// Ordinal of an entry, compared case-insensitively
    pub fn index_of(&self, string_id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry
                .string_id
                .chars()
                .flat_map(char::to_lowercase)
                .eq(string_id.chars().flat_map(char::to_lowercase))
        })
    }

    /// Display text of an entry.
    ///
    /// Returns the text of [`DISPLAY_LANGUAGE`] for the entry, or `string_id` itself when
    /// the entry doesn't exist.
    pub fn search<'a>(&'a self, string_id: &'a str) -> &'a str {
        self.index_of(string_id)
            .and_then(|entry| self.text(DISPLAY_LANGUAGE, entry))
            .unwrap_or(string_id)
    }
}

#[cfg(test)]
mod test {
    use crate::types::{Entry, RowGrid, RowShape, StringTable, ITEM_TYPE, QUEST_TYPE};

    fn table() -> StringTable {
        let mut table = StringTable::new("NRST01", 2);
        for (i, (korean, english)) in [("검", "Sword"), ("방패", "Shield")].iter().enumerate() {
            let entry = table.push_entry(Entry::new(format!("ITEM_{:03}", i + 1), i as i32));
            table.set_text(0, entry, *korean);
            table.set_text(1, entry, *english);
        }
        table
    }

    #[test]
    fn shape_from_type_tag() {
        assert_eq!(RowShape::from_type_tag(QUEST_TYPE), RowShape::Quest);
        assert_eq!(RowShape::from_type_tag(ITEM_TYPE), RowShape::Commented);
        assert_eq!(RowShape::from_type_tag("NRST01"), RowShape::Plain);
        assert_eq!(RowShape::from_type_tag(""), RowShape::Plain);
    }

    #[test]
    fn new_table_matches_type() {
        let table = StringTable::new(QUEST_TYPE, 3);
        assert!(matches!(table.rows(), RowGrid::Quest(rows) if rows.len() == 3));
        assert_eq!(table.language_count(), 3);
        assert!(table.is_empty());
    }

    #[test]
    fn search_uses_second_language() {
        let table = table();
        assert_eq!(table.search("ITEM_002"), "Shield");
        assert_eq!(table.search("item_001"), "Sword");
    }

    #[test]
    fn search_miss_returns_id() {
        let table = table();
        assert_eq!(table.search("NOPE"), "NOPE");
    }

    #[test]
    fn search_single_language_returns_id() {
        let mut table = StringTable::new("NRST01", 1);
        let entry = table.push_entry(Entry::new("ITEM_001".into(), 1));
        table.set_text(0, entry, "only");

        assert_eq!(table.search("ITEM_001"), "ITEM_001");
    }

    #[test]
    fn push_entry_grows_every_language() {
        let mut table = StringTable::new(ITEM_TYPE, 4);
        table.push_entry(Entry::default());

        match table.rows() {
            RowGrid::Commented(rows) => assert!(rows.iter().all(|language| language.len() == 1)),
            other => panic!("unexpected grid {other:?}"),
        }
    }

    #[test]
    fn set_text_out_of_range() {
        let mut table = table();
        assert!(!table.set_text(2, 0, "missing language"));
        assert!(!table.set_text(0, 2, "missing entry"));
    }
}
