//! Read-only accessor resolving k-mer keys to vertices
//!
//! A lookup dispatches on the key's first symbol to one of four contiguous
//! record partitions, then binary-searches that partition by the packed key
//! suffix. Misses are ordinary control flow: [`GraphReader::find`] returns
//! `false`, never an error, because most neighbor probes in open-ended graph
//! traversal are expected to miss.

use std::fs::File;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;

use super::header::{GraphHeader, VertexRecord, SIZE_HEADER, SIZE_RECORD};
use crate::codec::{code_of, is_symbol, pack_suffix};
use crate::error::{ReadError, Result};
use crate::vertex::Vertex;

struct Mapped {
    mmap: Mmap,
    header: GraphHeader,
}

/// Read-only, memory-mapped view of a k-mer graph store
#[derive(Default)]
pub struct GraphReader {
    mapped: Option<Mapped>,
}

impl GraphReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the graph store file at `path` read-only and validates its
    /// header.
    ///
    /// Idempotent: a no-op when the reader is already open.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::StoreUnavailable`] when the file cannot be opened
    /// or mapped, a header error when the magic number or k-mer length is
    /// invalid, and [`ReadError::FileTruncation`] when the file size or the
    /// dispatch table is inconsistent with the entry count.
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
        let header = GraphHeader::from_buffer(&mmap)?;
        let expected = SIZE_HEADER as u64 + header.entries * SIZE_RECORD as u64;
        if mmap.len() as u64 != expected {
            return Err(ReadError::FileTruncation(mmap.len()).into());
        }
        for partition in &header.partitions {
            if partition.first + partition.count > header.entries {
                return Err(ReadError::FileTruncation(mmap.len()).into());
            }
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

    /// Returns the store's fixed k-mer length, or 0 when the reader is not
    /// open.
    #[must_use]
    pub fn kmer_length(&self) -> usize {
        self.mapped
            .as_ref()
            .map_or(0, |m| m.header.kmer_length as usize)
    }

    /// Returns the number of vertex records, or 0 when the reader is not
    /// open.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.mapped.as_ref().map_or(0, |m| m.header.entries)
    }

    /// Resolves `key` to a vertex record, populating `out` on a hit.
    ///
    /// Returns `false` when the reader is not open, when `key` is not
    /// exactly [`Self::kmer_length`] valid nucleotide symbols, or when the
    /// key is absent from the store; `out` is unspecified in that case. On a
    /// hit `out` carries the key as its sequence together with the stored
    /// coverage, edge bitmasks, and annotation offset.
    #[must_use]
    pub fn find(&self, key: &str, out: &mut Vertex) -> bool {
        let Some(mapped) = self.mapped.as_ref() else {
            return false;
        };
        let bytes = key.as_bytes();
        if bytes.len() != mapped.header.kmer_length as usize
            || !bytes.iter().all(|&symbol| is_symbol(symbol))
        {
            return false;
        }

        let partition = mapped.header.partitions[code_of(bytes[0]) as usize];
        let target = pack_suffix(bytes);
        let Some(index) = binary_search(&mapped.mmap, partition.first, partition.count, target)
        else {
            return false;
        };

        let at = SIZE_HEADER + index as usize * SIZE_RECORD;
        let record = VertexRecord::from_bytes(&mapped.mmap[at..at + SIZE_RECORD]);
        out.set_sequence(key);
        out.set_coverage(record.coverage);
        out.set_edge_masks(record.parent_mask, record.child_mask);
        out.set_annotation_offset(record.annotation_offset);
        true
    }
}

/// Binary search by suffix code over a contiguous, ascending record run.
///
/// Returns the matching record index within the whole record section.
fn binary_search(mmap: &[u8], first: u64, count: u64, target: u64) -> Option<u64> {
    let suffix_at = |index: u64| {
        let at = SIZE_HEADER + index as usize * SIZE_RECORD;
        LittleEndian::read_u64(&mmap[at..at + 8])
    };
    let mut low = first;
    let mut high = first + count;
    while low < high {
        let middle = low + (high - low) / 2;
        match suffix_at(middle).cmp(&target) {
            std::cmp::Ordering::Less => low = middle + 1,
            std::cmp::Ordering::Greater => high = middle,
            std::cmp::Ordering::Equal => return Some(middle),
        }
    }
    None
}
