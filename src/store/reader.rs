//! Read-only accessor for indexed sequence store files
//!
//! The accessor memory-maps a store built by [`crate::store::build`] and
//! resolves logical record indices to byte ranges with direct offset
//! arithmetic on the directory. No parsing happens at read time: name and
//! sequence bytes are served as zero-copy slices of the mapped region.
//!
//! A single open reader may be shared across threads for reads; opening or
//! closing concurrently with reads must be serialized by the caller (the
//! `&mut self` receivers enforce this within one handle).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use bytemuck::cast_slice;
use memmap2::Mmap;

use super::header::{DirectoryEntry, StoreHeader, SIZE_DIRECTORY_ENTRY, SIZE_HEADER};
use crate::error::{ReadError, Result};

struct Mapped {
    mmap: Mmap,
    header: StoreHeader,
}

/// Read-only, memory-mapped view of an indexed sequence store
#[derive(Default)]
pub struct StoreReader {
    mapped: Option<Mapped>,
}

impl StoreReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the store file at `path` read-only and validates its header.
    ///
    /// Idempotent: a no-op when the reader is already open.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::StoreUnavailable`] when the file cannot be opened
    /// or mapped, a header error when the magic number does not match, and
    /// [`ReadError::FileTruncation`] when the file is too small to hold the
    /// directory its header promises.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if self.mapped.is_some() {
            return Ok(());
        }
        let file = File::open(path).map_err(|_| ReadError::StoreUnavailable)?;
        if !file.metadata()?.is_file() {
            return Err(ReadError::IncompatibleFile.into());
        }
        // Safety: the store file is write-once and never modified after the
        // build step.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|_| ReadError::StoreUnavailable)?;
        let header = StoreHeader::from_buffer(&mmap)?;
        if (mmap.len() as u64) < header.data_offset() {
            return Err(ReadError::FileTruncation(mmap.len()).into());
        }
        self.mapped = Some(Mapped { mmap, header });
        Ok(())
    }

    /// Releases the mapping; a no-op when the reader is not open.
    pub fn close(&mut self) {
        self.mapped = None;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mapped.is_some()
    }

    /// Returns the number of records, or 0 when the reader is not open.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.mapped.as_ref().map_or(0, |m| m.header.entries)
    }

    /// Returns the absolute byte range `(offset, length)` of a record's name.
    pub fn name_range(&self, entry: u64) -> Result<(u64, u64)> {
        let directory = self.directory_entry(entry)?;
        Ok((directory.name_offset, directory.name_length))
    }

    /// Returns the absolute byte range `(offset, length)` of a record's
    /// sequence.
    pub fn sequence_range(&self, entry: u64) -> Result<(u64, u64)> {
        let directory = self.directory_entry(entry)?;
        Ok((directory.sequence_offset, directory.sequence_length))
    }

    /// Returns a record's name bytes as a slice of the mapped region.
    pub fn name(&self, entry: u64) -> Result<&[u8]> {
        let (offset, length) = self.name_range(entry)?;
        self.mapped_bytes(offset, length)
    }

    /// Returns a record's sequence bytes as a slice of the mapped region.
    ///
    /// The slice points directly into the mapped file, so the query layer can
    /// stream sequence windows without copying.
    pub fn sequence(&self, entry: u64) -> Result<&[u8]> {
        let (offset, length) = self.sequence_range(entry)?;
        self.mapped_bytes(offset, length)
    }

    /// Dumps every directory entry and record name; a diagnostic aid, not
    /// part of the serving contract.
    pub fn dump<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mapped = self.mapped.as_ref().ok_or(ReadError::StoreUnavailable)?;
        writeln!(writer, "magic: {}", mapped.header.magic)?;
        writeln!(writer, "entries: {}", mapped.header.entries)?;
        for entry in 0..mapped.header.entries {
            let directory = self.directory_entry(entry)?;
            let name = std::str::from_utf8(self.name(entry)?)?;
            writeln!(
                writer,
                "\t[{entry}]\t{}\t{}\t{}\t{}\tname={name}",
                directory.name_offset,
                directory.name_length,
                directory.sequence_offset,
                directory.sequence_length,
            )?;
        }
        Ok(())
    }

    fn directory_entry(&self, entry: u64) -> Result<DirectoryEntry> {
        let mapped = self.mapped.as_ref().ok_or(ReadError::StoreUnavailable)?;
        if entry >= mapped.header.entries {
            return Err(ReadError::OutOfRange(entry, mapped.header.entries).into());
        }
        let start = SIZE_HEADER + entry as usize * SIZE_DIRECTORY_ENTRY;
        let bytes = &mapped.mmap[start..start + SIZE_DIRECTORY_ENTRY];
        Ok(DirectoryEntry::from_words(cast_slice(bytes)))
    }

    fn mapped_bytes(&self, offset: u64, length: u64) -> Result<&[u8]> {
        let mapped = self.mapped.as_ref().ok_or(ReadError::StoreUnavailable)?;
        let start = offset as usize;
        let end = start + length as usize;
        if end > mapped.mmap.len() {
            return Err(ReadError::FileTruncation(mapped.mmap.len()).into());
        }
        Ok(&mapped.mmap[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::build;
    use anyhow::Result;
    use tempfile::tempdir;

    fn build_sample(fasta: &[u8]) -> Result<(tempfile::TempDir, StoreReader)> {
        let dir = tempdir()?;
        let input = dir.path().join("input.fasta");
        let output = dir.path().join("store.bin");
        std::fs::write(&input, fasta)?;
        build(&input, &output)?;
        let mut reader = StoreReader::new();
        reader.open(&output)?;
        Ok((dir, reader))
    }

    #[test]
    fn test_round_trip_logical_order() -> Result<()> {
        let (_dir, reader) = build_sample(b">a\nACGT\n>b\nAC\n")?;
        assert_eq!(reader.entry_count(), 2);
        assert_eq!(reader.name(0)?, b"a");
        assert_eq!(reader.sequence(0)?, b"ACGT");
        assert_eq!(reader.name(1)?, b"b");
        assert_eq!(reader.sequence(1)?, b"AC");
        Ok(())
    }

    #[test]
    fn test_physical_order_by_descending_length() -> Result<()> {
        // logical order: short record first; physically the long one must
        // come first in the data section
        let (_dir, reader) = build_sample(b">short\nAC\n>long\nACGTACGT\n")?;
        let (short_offset, short_length) = reader.sequence_range(0)?;
        let (long_offset, long_length) = reader.sequence_range(1)?;
        assert_eq!(short_length, 2);
        assert_eq!(long_length, 8);
        assert!(long_offset < short_offset);
        Ok(())
    }

    #[test]
    fn test_multi_line_sequences_are_joined() -> Result<()> {
        let (_dir, reader) = build_sample(b">joined\nACGT\nGGTT\nA\n")?;
        assert_eq!(reader.sequence(0)?, b"ACGTGGTTA");
        Ok(())
    }

    #[test]
    fn test_open_close_idempotent() -> Result<()> {
        let (dir, mut reader) = build_sample(b">a\nACGT\n")?;
        let path = dir.path().join("store.bin");
        reader.open(&path)?; // second open is a no-op
        assert_eq!(reader.entry_count(), 1);
        reader.close();
        reader.close(); // second close is a no-op
        assert!(!reader.is_open());
        assert_eq!(reader.entry_count(), 0);
        Ok(())
    }

    #[test]
    fn test_out_of_range_entry() -> Result<()> {
        let (_dir, reader) = build_sample(b">a\nACGT\n")?;
        assert!(reader.name_range(1).is_err());
        Ok(())
    }

    #[test]
    fn test_open_missing_file_fails() {
        let mut reader = StoreReader::new();
        assert!(reader.open("/nonexistent/store.bin").is_err());
    }

    #[test]
    fn test_open_rejects_wrong_magic() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bogus.bin");
        std::fs::write(&path, vec![0u8; 64])?;
        let mut reader = StoreReader::new();
        assert!(reader.open(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_dump_lists_all_entries() -> Result<()> {
        let (_dir, reader) = build_sample(b">a\nACGT\n>b\nAC\n")?;
        let mut out = Vec::new();
        reader.dump(&mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("entries: 2"));
        assert!(text.contains("name=a"));
        assert!(text.contains("name=b"));
        Ok(())
    }
}
