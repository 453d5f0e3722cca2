//! Types for writing offset-indexed record files
//!

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Seek, SeekFrom, Write};
use tracing::instrument;

use crate::{
    encoding::TextEncoding,
    error::{Error, Result},
    types::LengthPrefix,
};

/// A block of offsets reserved in the output
///
/// Created by [`RecordWriter::reserve_offsets`], which writes `len` zeroed slots. Each record
/// start is then captured with [`RecordWriter::record_offset`], and once every record is
/// written [`RecordWriter::patch`] overwrites the placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    start: u64,
    len: usize,
    offsets: Vec<u32>,
}

impl OffsetTable {
    /// Absolute position of the first slot
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of reserved slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no slots were reserved
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offsets recorded so far
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Whether every slot has an offset
    pub fn is_complete(&self) -> bool {
        self.offsets.len() == self.len
    }
}

/// Record file generator
///
/// The whole file is assembled in memory, so seeking back to patch an offset table never
/// touches storage. Call [`RecordWriter::into_inner`] to get the finished bytes.
///
/// ```
/// # fn doit() -> rose_record::error::Result<()> {
/// use rose_record::{LengthPrefix, RecordWriter, TextEncoding};
///
/// let mut writer = RecordWriter::new(TextEncoding::Korean);
/// let mut table = writer.reserve_offsets(2)?;
///
/// for text in ["first", "second"] {
///     writer.record_offset(&mut table)?;
///     writer.write_string(LengthPrefix::VarInt, text)?;
/// }
/// writer.patch(&table)?;
///
/// let data = writer.into_inner();
/// assert_eq!(&data[0..8], &[0x08, 0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00]);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug)]
pub struct RecordWriter {
    inner: Cursor<Vec<u8>>,
    encoding: TextEncoding,
}

impl RecordWriter {
    /// Create an empty file, encoding strings with `encoding`.
    pub fn new(encoding: TextEncoding) -> RecordWriter {
        RecordWriter {
            inner: Cursor::new(Vec::new()),
            encoding,
        }
    }

    /// Encoding used for strings
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Current absolute position as a file offset
    pub fn position(&self) -> Result<u32> {
        let position = self.inner.position();
        u32::try_from(position).map_err(|_| Error::FileTooLarge { len: position })
    }

    /// Write a little endian `u16`
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.inner.write_u16::<LittleEndian>(value)?)
    }

    /// Write a little endian `u32`
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    /// Write a little endian `i32`
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.inner.write_i32::<LittleEndian>(value)?)
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.inner.write_all(bytes)?)
    }

    fn write_length(&mut self, prefix: LengthPrefix, length: usize) -> Result<()> {
        if length > prefix.max_len() {
            return Err(Error::StringTooLong {
                len: length,
                max: prefix.max_len(),
            });
        }

        match prefix {
            LengthPrefix::U16 => self.write_u16(length as u16),
            LengthPrefix::VarInt => {
                let mut value = length;
                loop {
                    let mut byte = (value & 0x7F) as u8;
                    value >>= 7;
                    if value != 0 {
                        byte |= 0x80;
                    }
                    self.inner.write_u8(byte)?;
                    if value == 0 {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Encode `text` and write it behind its encoded byte length.
    pub fn write_string(&mut self, prefix: LengthPrefix, text: &str) -> Result<()> {
        let bytes = self.encoding.encode(text);
        self.write_length(prefix, bytes.len())?;
        self.write_bytes(&bytes)
    }

    /// Reserve `len` zeroed offset slots at the current position.
    pub fn reserve_offsets(&mut self, len: usize) -> Result<OffsetTable> {
        let start = self.inner.position();
        self.write_bytes(&vec![0u8; len * 4])?;

        Ok(OffsetTable {
            start,
            len,
            offsets: Vec::with_capacity(len),
        })
    }

    /// Record the current position as the next offset of `table`.
    pub fn record_offset(&mut self, table: &mut OffsetTable) -> Result<u32> {
        if table.is_complete() {
            return Err(Error::IncompleteOffsetTable {
                expected: table.len,
                actual: table.offsets.len() + 1,
            });
        }

        let offset = self.position()?;
        table.offsets.push(offset);
        Ok(offset)
    }

    /// Overwrite the placeholder slots of `table` with its recorded offsets.
    ///
    /// The cursor is restored afterwards so writing continues where it left off.
    #[instrument(skip_all, err, level = "trace", fields(start = table.start, len = table.len))]
    pub fn patch(&mut self, table: &OffsetTable) -> Result<()> {
        if !table.is_complete() {
            return Err(Error::IncompleteOffsetTable {
                expected: table.len,
                actual: table.offsets.len(),
            });
        }

        let resume = self.inner.position();
        self.inner.seek(SeekFrom::Start(table.start))?;
        for offset in &table.offsets {
            self.write_u32(*offset)?;
        }
        self.inner.seek(SeekFrom::Start(resume))?;

        Ok(())
    }

    /// Mutable access to the output, for fixed-layout headers serialized elsewhere
    pub fn get_mut(&mut self) -> &mut Cursor<Vec<u8>> {
        &mut self.inner
    }

    /// Return the bytes written so far
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{
        encoding::TextEncoding,
        error::{Error, Result},
        types::LengthPrefix,
        write::RecordWriter,
    };

    #[test]
    fn write_varint_prefix() -> Result<()> {
        let mut writer = RecordWriter::new(TextEncoding::Korean);
        writer.write_string(LengthPrefix::VarInt, &"a".repeat(130))?;

        let data = writer.into_inner();
        assert_eq!(&data[0..2], &[0x82, 0x01]);
        assert_eq!(data.len(), 132);

        Ok(())
    }

    #[test]
    fn write_prefix_counts_encoded_bytes() -> Result<()> {
        let mut writer = RecordWriter::new(TextEncoding::Korean);
        writer.write_string(LengthPrefix::U16, "테스트")?;

        #[rustfmt::skip]
        let expected = vec![
            0x06, 0x00,
            0xC5, 0xD7, 0xBD, 0xBA, 0xC6, 0xAE,
        ];

        assert_eq!(writer.into_inner(), expected);

        Ok(())
    }

    #[test]
    fn write_string_too_long_for_prefix() {
        let mut writer = RecordWriter::new(TextEncoding::Korean);
        assert!(matches!(
            writer.write_string(LengthPrefix::U16, &"a".repeat(70_000)),
            Err(Error::StringTooLong {
                len: 70_000,
                max: 65535
            })
        ));
    }

    #[test]
    fn patch_restores_cursor() -> Result<()> {
        let mut writer = RecordWriter::new(TextEncoding::Korean);
        writer.write_u32(0xAABBCCDD)?;

        let mut table = writer.reserve_offsets(2)?;
        assert_eq!(table.start(), 4);

        writer.record_offset(&mut table)?;
        writer.write_string(LengthPrefix::VarInt, "ab")?;
        writer.record_offset(&mut table)?;
        writer.write_string(LengthPrefix::VarInt, "c")?;

        writer.patch(&table)?;
        writer.write_u16(0xFFFF)?;

        #[rustfmt::skip]
        let expected = vec![
            0xDD, 0xCC, 0xBB, 0xAA,
            // Offsets
            0x0C, 0x00, 0x00, 0x00,
            0x0F, 0x00, 0x00, 0x00,
            // Records
            0x02, b'a', b'b',
            0x01, b'c',
            0xFF, 0xFF,
        ];

        assert_eq!(writer.into_inner(), expected);

        Ok(())
    }

    #[test]
    fn patch_incomplete_table() -> Result<()> {
        let mut writer = RecordWriter::new(TextEncoding::Korean);
        let mut table = writer.reserve_offsets(2)?;
        writer.record_offset(&mut table)?;

        assert!(matches!(
            writer.patch(&table),
            Err(Error::IncompleteOffsetTable {
                expected: 2,
                actual: 1
            })
        ));

        Ok(())
    }

    #[test]
    fn record_past_reserved_slots() -> Result<()> {
        let mut writer = RecordWriter::new(TextEncoding::Korean);
        let mut table = writer.reserve_offsets(0)?;

        assert!(table.is_empty());
        assert!(writer.record_offset(&mut table).is_err());
        writer.patch(&table)?;

        Ok(())
    }
}
