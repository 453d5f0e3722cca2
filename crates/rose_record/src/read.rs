//! Types for reading offset-indexed record files
//!

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::{
    encoding::TextEncoding,
    error::{Error, Result},
    types::LengthPrefix,
};

/// Cursor over a record file
///
/// Every offset handled by this reader is absolute from the start of the file. Lengths read
/// from the file are checked against the bytes that remain before anything is allocated,
/// so a corrupted length can't drive a huge allocation.
///
/// ```
/// use std::io::Cursor;
/// use rose_record::{LengthPrefix, RecordReader, TextEncoding};
///
/// # fn doit() -> rose_record::error::Result<()> {
/// let data = vec![0x05, b'h', b'e', b'l', b'l', b'o'];
/// let mut reader = RecordReader::new(Cursor::new(data), TextEncoding::Korean)?;
/// assert_eq!(reader.read_string(LengthPrefix::VarInt)?, "hello");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct RecordReader<R> {
    reader: R,
    len: u64,
    encoding: TextEncoding,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Wrap a reader, decoding strings with `encoding`.
    ///
    /// The reader is rewound to the start of the file.
    pub fn new(mut reader: R, encoding: TextEncoding) -> Result<RecordReader<R>> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.rewind()?;

        Ok(RecordReader {
            reader,
            len,
            encoding,
        })
    }

    /// Encoding used for strings
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Total length of the file in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current absolute position
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.reader.stream_position()?)
    }

    /// Bytes left between the cursor and the end of the file
    pub fn remaining(&mut self) -> Result<u64> {
        Ok(self.len.saturating_sub(self.position()?))
    }

    /// Fail with [`Error::TruncatedRecord`] unless `needed` bytes remain
    pub fn ensure_remaining(&mut self, needed: u64) -> Result<()> {
        let remaining = self.remaining()?;
        if needed > remaining {
            return Err(Error::TruncatedRecord { needed, remaining });
        }
        Ok(())
    }

    /// Move the cursor to an absolute offset inside the file
    pub fn seek_absolute(&mut self, offset: i64) -> Result<()> {
        if offset < 0 || offset as u64 >= self.len {
            return Err(Error::OffsetOutOfRange {
                offset,
                len: self.len,
            });
        }
        self.reader.seek(SeekFrom::Start(offset as u64))?;
        Ok(())
    }

    /// Read a little endian `u16`
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure_remaining(2)?;
        Ok(self.reader.read_u16::<LittleEndian>()?)
    }

    /// Read a little endian `u32`
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure_remaining(4)?;
        Ok(self.reader.read_u32::<LittleEndian>()?)
    }

    /// Read a little endian `i32`
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure_remaining(4)?;
        Ok(self.reader.read_i32::<LittleEndian>()?)
    }

    /// Read exactly `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure_remaining(len as u64)?;
        let mut buffer = vec![0u8; len];
        self.reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn read_length(&mut self, prefix: LengthPrefix) -> Result<usize> {
        match prefix {
            LengthPrefix::U16 => Ok(self.read_u16()? as usize),
            LengthPrefix::VarInt => {
                let mut length = 0usize;
                for group in 0..4 {
                    self.ensure_remaining(1)?;
                    let byte = self.reader.read_u8()?;
                    length |= ((byte & 0x7F) as usize) << (group * 7);
                    if byte & 0x80 == 0 {
                        return Ok(length);
                    }
                }
                Err(Error::InvalidLengthPrefix)
            }
        }
    }

    /// Read a length-prefixed string and decode it with the active encoding.
    ///
    /// The prefix counts encoded bytes, not characters.
    pub fn read_string(&mut self, prefix: LengthPrefix) -> Result<String> {
        let length = self.read_length(prefix)?;
        let bytes = self.read_bytes(length)?;
        self.encoding.decode(&bytes)
    }

    /// Mutable access to the inner reader, for fixed-layout headers parsed elsewhere
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
