//! Header and directory structures for indexed sequence store files

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::error::{HeaderError, Result};

/// Magic number identifying an indexed sequence store file
pub const STORE_MAGIC: u64 = 1_234_567_890;

/// Size of the fixed header in bytes (magic + entry count)
pub const SIZE_HEADER: usize = 16;

/// Size of one directory entry in bytes (4 × u64)
pub const SIZE_DIRECTORY_ENTRY: usize = 32;

/// Fixed header of an indexed sequence store file.
///
/// The header is followed by `entries` directory entries in logical record
/// order, then by the concatenated record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHeader {
    /// Magic number to identify the file format
    pub magic: u64,
    /// Number of records in the store
    pub entries: u64,
}

impl StoreHeader {
    #[must_use]
    pub fn new(entries: u64) -> Self {
        Self {
            magic: STORE_MAGIC,
            entries,
        }
    }

    /// Parses and validates a header from the start of `buffer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is smaller than [`SIZE_HEADER`] or the
    /// magic number does not match [`STORE_MAGIC`].
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < SIZE_HEADER {
            return Err(HeaderError::InvalidSize(buffer.len(), SIZE_HEADER).into());
        }
        let magic = LittleEndian::read_u64(&buffer[0..8]);
        if magic != STORE_MAGIC {
            return Err(HeaderError::InvalidMagicNumber {
                found: magic,
                expected: STORE_MAGIC,
            }
            .into());
        }
        let entries = LittleEndian::read_u64(&buffer[8..16]);
        Ok(Self { magic, entries })
    }

    /// Writes the header in its binary representation.
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.magic)?;
        writer.write_u64::<LittleEndian>(self.entries)?;
        Ok(())
    }

    /// Returns the byte offset where the data section begins, i.e. the total
    /// size of the header plus the directory.
    #[must_use]
    pub fn data_offset(&self) -> u64 {
        SIZE_HEADER as u64 + self.entries * SIZE_DIRECTORY_ENTRY as u64
    }
}

/// One fixed-size directory entry mapping a logical record index to the
/// physical location of its name and sequence bytes.
///
/// Offsets are absolute byte offsets into the store file and always point
/// past the directory. The directory is the only authority mapping a logical
/// index to a physical location: the data section is physically reordered by
/// descending sequence length while the directory stays in input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Absolute offset of the record's name bytes
    pub name_offset: u64,
    /// Length of the record's name in bytes
    pub name_length: u64,
    /// Absolute offset of the record's sequence bytes
    pub sequence_offset: u64,
    /// Length of the record's sequence in bytes
    pub sequence_length: u64,
}

impl DirectoryEntry {
    /// Decodes an entry from its fixed 32-byte representation.
    #[must_use]
    pub fn from_words(words: &[u64]) -> Self {
        Self {
            name_offset: words[0],
            name_length: words[1],
            sequence_offset: words[2],
            sequence_length: words[3],
        }
    }

    /// Writes the entry in its binary representation.
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.name_offset)?;
        writer.write_u64::<LittleEndian>(self.name_length)?;
        writer.write_u64::<LittleEndian>(self.sequence_offset)?;
        writer.write_u64::<LittleEndian>(self.sequence_length)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() -> anyhow::Result<()> {
        let header = StoreHeader::new(42);
        let mut buffer = Vec::new();
        header.write_bytes(&mut buffer)?;
        assert_eq!(buffer.len(), SIZE_HEADER);
        assert_eq!(StoreHeader::from_buffer(&buffer)?, header);
        Ok(())
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut buffer = vec![0u8; SIZE_HEADER];
        buffer[0] = 0xFF;
        assert!(StoreHeader::from_buffer(&buffer).is_err());
    }

    #[test]
    fn test_header_rejects_short_buffer() {
        assert!(StoreHeader::from_buffer(&[0u8; 8]).is_err());
    }

    #[test]
    fn test_data_offset() {
        assert_eq!(StoreHeader::new(0).data_offset(), 16);
        assert_eq!(StoreHeader::new(3).data_offset(), 16 + 96);
    }
}
