//! Header, dispatch table, and record layout for k-mer graph store files

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::codec::NUM_CODES;
use crate::error::{HeaderError, Result};

/// Magic number identifying a k-mer graph store file
pub const GRAPH_MAGIC: u64 = 2_345_678_987;

/// Size of the fixed header in bytes: magic, entry count, k-mer length, and
/// the four-slot first-symbol dispatch table
pub const SIZE_HEADER: usize = 24 + NUM_CODES * 16;

/// Size of one vertex record in bytes
pub const SIZE_RECORD: usize = 24;

/// Largest supported k-mer length: a key suffix must pack into one u64
pub const MAX_KMER_LENGTH: u64 = 32;

/// One slot of the first-symbol dispatch table.
///
/// Describes the contiguous run of records whose key starts with the symbol
/// of this slot's code: `first` is an entry index, not a byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Partition {
    /// Index of the first record in this partition
    pub first: u64,
    /// Number of records in this partition
    pub count: u64,
}

/// Fixed header of a k-mer graph store file.
///
/// The dispatch table bounds every lookup to the records sharing the key's
/// first symbol before any comparison-based search runs, which keeps negative
/// lookups cheap; misses dominate open-ended graph traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphHeader {
    /// Magic number to identify the file format
    pub magic: u64,
    /// Number of vertex records in the store
    pub entries: u64,
    /// Fixed k-mer length shared by every key
    pub kmer_length: u64,
    /// First-symbol dispatch table, one slot per nucleotide code
    pub partitions: [Partition; NUM_CODES],
}

impl GraphHeader {
    #[must_use]
    pub fn new(entries: u64, kmer_length: u64, partitions: [Partition; NUM_CODES]) -> Self {
        Self {
            magic: GRAPH_MAGIC,
            entries,
            kmer_length,
            partitions,
        }
    }

    /// Parses and validates a header from the start of `buffer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is smaller than [`SIZE_HEADER`], the
    /// magic number does not match [`GRAPH_MAGIC`], or the recorded k-mer
    /// length is outside `1..=32`.
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < SIZE_HEADER {
            return Err(HeaderError::InvalidSize(buffer.len(), SIZE_HEADER).into());
        }
        let magic = LittleEndian::read_u64(&buffer[0..8]);
        if magic != GRAPH_MAGIC {
            return Err(HeaderError::InvalidMagicNumber {
                found: magic,
                expected: GRAPH_MAGIC,
            }
            .into());
        }
        let entries = LittleEndian::read_u64(&buffer[8..16]);
        let kmer_length = LittleEndian::read_u64(&buffer[16..24]);
        if kmer_length == 0 || kmer_length > MAX_KMER_LENGTH {
            return Err(HeaderError::UnsupportedKmerLength(kmer_length).into());
        }
        let mut partitions = [Partition::default(); NUM_CODES];
        for (code, partition) in partitions.iter_mut().enumerate() {
            let at = 24 + code * 16;
            partition.first = LittleEndian::read_u64(&buffer[at..at + 8]);
            partition.count = LittleEndian::read_u64(&buffer[at + 8..at + 16]);
        }
        Ok(Self {
            magic,
            entries,
            kmer_length,
            partitions,
        })
    }

    /// Writes the header in its binary representation.
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.magic)?;
        writer.write_u64::<LittleEndian>(self.entries)?;
        writer.write_u64::<LittleEndian>(self.kmer_length)?;
        for partition in &self.partitions {
            writer.write_u64::<LittleEndian>(partition.first)?;
            writer.write_u64::<LittleEndian>(partition.count)?;
        }
        Ok(())
    }
}

/// One fixed-size vertex record.
///
/// The key's first symbol is implicit in the partition the record belongs
/// to; the remaining symbols are stored as a packed suffix code (see
/// [`crate::codec::pack_suffix`]) so records within a partition sort by key
/// and support binary search.
///
/// | Offset | Size | Name              |
/// | ------ | ---- | ----------------- |
/// | 0      | 8    | suffix code       |
/// | 8      | 4    | coverage          |
/// | 12     | 1    | parent mask       |
/// | 13     | 1    | child mask        |
/// | 14     | 2    | reserved (zero)   |
/// | 16     | 8    | annotation offset |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexRecord {
    pub suffix_code: u64,
    pub coverage: u32,
    pub parent_mask: u8,
    pub child_mask: u8,
    pub annotation_offset: u64,
}

impl VertexRecord {
    /// Decodes a record from its fixed 24-byte representation.
    #[must_use]
    pub fn from_bytes(buffer: &[u8]) -> Self {
        Self {
            suffix_code: LittleEndian::read_u64(&buffer[0..8]),
            coverage: LittleEndian::read_u32(&buffer[8..12]),
            parent_mask: buffer[12],
            child_mask: buffer[13],
            annotation_offset: LittleEndian::read_u64(&buffer[16..24]),
        }
    }

    /// Writes the record in its binary representation.
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.suffix_code)?;
        writer.write_u32::<LittleEndian>(self.coverage)?;
        writer.write_u8(self.parent_mask)?;
        writer.write_u8(self.child_mask)?;
        writer.write_all(&[0u8; 2])?;
        writer.write_u64::<LittleEndian>(self.annotation_offset)?;
        Ok(())
    }
}
