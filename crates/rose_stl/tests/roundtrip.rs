use pretty_assertions::assert_eq;
use rose_record::TextEncoding;
use rose_stl::{
    error::Result,
    types::{Entry, QuestRow, RowGrid, RowShape, ITEM_TYPE, NORMAL_TYPE, QUEST_TYPE},
    StringTable, StringTableReader, StringTableWriter,
};
use std::io::Cursor;
use tracing_test::traced_test;

fn sample(type_tag: &str, languages: usize) -> StringTable {
    let mut table = StringTable::new(type_tag, languages);
    for (i, (korean, english)) in [("검", "Sword"), ("방패", "Shield"), ("", "Empty")]
        .iter()
        .enumerate()
    {
        let entry = table.push_entry(Entry::new(format!("ITEM_{:03}", i + 1), 100 + i as i32));
        table.set_text(0, entry, *korean);
        table.set_text(1, entry, *english);
    }
    table
}

#[traced_test]
#[test]
fn roundtrip_plain() -> Result<()> {
    let table = sample(NORMAL_TYPE, 2);
    let decoded = StringTable::decode(&table.to_bytes()?);

    assert_eq!(decoded, table);
    assert_eq!(decoded.shape(), RowShape::Plain);

    Ok(())
}

#[traced_test]
#[test]
fn roundtrip_commented() -> Result<()> {
    let mut table = sample(ITEM_TYPE, 3);
    if let RowGrid::Commented(rows) = table.rows_mut() {
        rows[1][0].comment = "한손검".into();
        rows[2][2].text = "trailing language".into();
    }

    let decoded = StringTable::decode(&table.to_bytes()?);

    assert_eq!(decoded, table);
    assert_eq!(decoded.language_count(), 3);

    Ok(())
}

#[traced_test]
#[test]
fn roundtrip_quest() -> Result<()> {
    let mut table = sample(QUEST_TYPE, 2);
    if let RowGrid::Quest(rows) = table.rows_mut() {
        rows[1][1] = QuestRow {
            text: "Find the shield".into(),
            comment: "starter quest".into(),
            quest1: "Talk to the smith".into(),
            quest2: "Return to town".into(),
        };
    }

    let decoded = StringTable::decode(&table.to_bytes()?);

    assert_eq!(decoded, table);
    match decoded.rows() {
        RowGrid::Quest(rows) => assert_eq!(rows[1][1].quest2, "Return to town"),
        other => panic!("unexpected grid {other:?}"),
    }

    Ok(())
}

#[traced_test]
#[test]
fn roundtrip_is_stable() -> Result<()> {
    let data = sample(ITEM_TYPE, 2).to_bytes()?;
    assert_eq!(StringTable::decode(&data).to_bytes()?, data);

    Ok(())
}

#[traced_test]
#[test]
fn language_offset_past_end_of_file() -> Result<()> {
    let mut table = StringTable::new(NORMAL_TYPE, 3);
    let entry = table.push_entry(Entry::new("A".into(), 1));
    table.set_text(0, entry, "zero");
    table.set_text(1, entry, "one");
    table.set_text(2, entry, "two");

    let mut data = table.to_bytes()?;

    // Type (7) + entry count (4) + entry (6) + language count (4) + two language offsets
    data[29..33].copy_from_slice(&0x0FFF_FFFFi32.to_le_bytes());

    let decoded = StringTable::decode(&data);

    assert_eq!(decoded.language_count(), 3);
    assert_eq!(decoded.text(0, 0), Some("zero"));
    assert_eq!(decoded.text(1, 0), Some("one"));
    assert_eq!(decoded.text(2, 0), Some(""));
    assert!(logs_contain("skipping language 2"));

    Ok(())
}

fn two_entry_table() -> StringTable {
    let mut table = StringTable::new(NORMAL_TYPE, 2);
    for (id, (local, english)) in ["A", "B"].iter().zip([("검검", "one"), ("x", "two")]) {
        let entry = table.push_entry(Entry::new((*id).into(), 1));
        table.set_text(0, entry, local);
        table.set_text(1, entry, english);
    }
    table
}

// Type (7) + entry count (4) + two entries (12) + language count (4) + language offsets (8)
// + the entry table of language 0 (8)
const SECOND_ENTRY_OFFSET_OF_LANGUAGE_1: usize = 47;

// Rows of language 0 follow both entry tables
const FIRST_ROW: usize = 51;

#[traced_test]
#[test]
fn row_offset_inside_another_row() -> Result<()> {
    let mut data = two_entry_table().to_bytes()?;

    // One byte into "검검", whose bytes all carry the continuation bit
    let slot = SECOND_ENTRY_OFFSET_OF_LANGUAGE_1;
    data[slot..slot + 4].copy_from_slice(&(FIRST_ROW as i32 + 1).to_le_bytes());

    let decoded = StringTable::decode(&data);

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.encoding(), TextEncoding::Korean);
    assert_eq!(decoded.text(0, 0), Some("검검"));
    assert_eq!(decoded.text(0, 1), Some("x"));
    assert_eq!(decoded.text(1, 0), Some("one"));
    assert_eq!(decoded.text(1, 1), Some(""));
    assert!(logs_contain("using fallback for row of entry 1 in language 1"));
    assert!(logs_contain("invalid variable-length string prefix"));

    Ok(())
}

#[traced_test]
#[test]
fn undecodable_row_is_dropped() -> Result<()> {
    let mut data = two_entry_table().to_bytes()?;

    // "검검" takes 5 bytes, then "x" follows its 1-byte prefix
    let text_of_second_row = FIRST_ROW + 5 + 1;
    assert_eq!(data[text_of_second_row], b'x');
    data[text_of_second_row] = 0xFF;

    let decoded = StringTable::decode(&data);

    assert_eq!(decoded.encoding(), TextEncoding::Korean);
    assert_eq!(decoded.text(0, 0), Some("검검"));
    assert_eq!(decoded.text(0, 1), Some(""));
    assert_eq!(decoded.text(1, 0), Some("one"));
    assert_eq!(decoded.text(1, 1), Some("two"));
    assert!(logs_contain("unable to parse string table as GB18030"));
    assert!(logs_contain("without its undecodable rows"));
    assert!(!logs_contain("unable to parse string table with any encoding"));

    Ok(())
}

#[traced_test]
#[test]
fn falls_back_to_japanese() -> Result<()> {
    let mut table = StringTable::new(NORMAL_TYPE, 2);
    let entry = table.push_entry(Entry::new("KANA".into(), 1));
    table.set_text(0, entry, "ｱ");
    table.set_text(1, entry, "A");

    let data = StringTableWriter::new(TextEncoding::Japanese).write(&table)?;

    let decoded = StringTable::decode(&data);
    let expected = StringTableReader::new(Cursor::new(&data), TextEncoding::Japanese)?.read()?;

    assert_eq!(decoded, expected);
    assert_eq!(decoded.encoding(), TextEncoding::Japanese);
    assert_eq!(decoded.text(0, 0), Some("ｱ"));
    assert!(logs_contain("unable to parse string table as EUC-KR"));

    Ok(())
}

#[test]
fn search_hit_and_miss() {
    let table = sample(NORMAL_TYPE, 2);

    assert_eq!(table.search("ITEM_002"), "Shield");
    assert_eq!(table.search("Item_003"), "Empty");
    assert_eq!(table.search("ITEM_999"), "ITEM_999");
}

#[traced_test]
#[test]
fn save_and_load_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("LIST_WEAPON_S.STL");

    let mut table = sample(ITEM_TYPE, 2);
    table.save_as(&path)?;
    assert_eq!(table.path(), Some(path.as_path()));

    let mut loaded = StringTable::load(&path);
    assert_eq!(loaded, table);

    loaded.set_text(1, 0, "Long Sword");
    loaded.save()?;

    assert_eq!(StringTable::load(&path).search("ITEM_001"), "Long Sword");

    Ok(())
}

#[traced_test]
#[test]
fn load_missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("MISSING.STL");

    let table = StringTable::load(&path);

    assert!(table.is_empty());
    assert_eq!(table.language_count(), 0);
    assert_eq!(table.path(), Some(path.as_path()));
    assert!(logs_contain("unable to read"));

    Ok(())
}
